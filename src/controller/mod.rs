//! Session lifecycle: opening the overlay for a screenshot, routing input
//! to the drawing engine, the save protocol and teardown.

mod error;
mod keyboard;
mod save;
#[cfg(test)]
mod test_support;
mod worker;

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use serde::Deserialize;

use crate::config::AnnotatorConfig;
use crate::editor::{
    fit_canvas, CanvasChrome, DrawingEngine, ImageBounds, StyleChange, StyleControls, ToolKind,
    ToolPoint,
};
use crate::export::{decode_data_url, GlyphSource};
use crate::feedback::{Toast, ToastSlot};
use crate::input::{TextInputAction, TextInputEvent};
use crate::overlay::{layout_overlay, ControlsView, OverlayHost, OverlayShell, UiEvent};
use crate::session::SessionState;
use crate::state::{SessionEvent, SessionPhase, StateMachine};
use crate::storage::AnnotationSink;

pub use error::{SessionError, SessionResult};
pub use keyboard::{KeyOutcome, KeyPress};
pub use save::{SaveOutcome, SaveStatus};

/// Delivered by the capture side when the user asks to annotate a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationMessage {
    pub screenshot: String,
    pub page_url: String,
    pub page_title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: i32,
    pub y: i32,
}

/// Owns the one session state a page may have and everything that acts on
/// it. All methods run on the UI thread; only the save hand-off leaves it.
pub struct SessionController<H: OverlayHost> {
    host: H,
    sink: Arc<dyn AnnotationSink>,
    config: AnnotatorConfig,
    glyphs: GlyphSource,
    state: SessionState,
    machine: StateMachine,
    shell: OverlayShell,
    controls: StyleControls,
    toast: ToastSlot,
    delivery: Option<save::InFlightSave>,
    close_at: Option<Instant>,
}

fn default_controls(config: &AnnotatorConfig) -> StyleControls {
    StyleControls::new(
        config.default_color,
        config.default_stroke_width,
        config.default_font_size,
    )
}

impl<H: OverlayHost> SessionController<H> {
    pub fn new(
        host: H,
        sink: Arc<dyn AnnotationSink>,
        config: AnnotatorConfig,
        glyphs: GlyphSource,
    ) -> Self {
        Self {
            host,
            sink,
            controls: default_controls(&config),
            toast: ToastSlot::new(config.toast_duration()),
            config,
            glyphs,
            state: SessionState::new(),
            machine: StateMachine::new(),
            shell: OverlayShell::new(),
            delivery: None,
            close_at: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn shell(&self) -> &OverlayShell {
        &self.shell
    }

    pub fn controls(&self) -> StyleControls {
        self.controls
    }

    pub fn current_toast(&self) -> Option<&Toast> {
        self.toast.current()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn delete_enabled(&self) -> bool {
        self.shell
            .rendered_controls()
            .is_some_and(|view| view.delete_enabled)
    }

    pub fn is_editing_text(&self) -> bool {
        self.state
            .canvas
            .as_ref()
            .is_some_and(|canvas| canvas.is_editing_text())
    }

    /// Handles an activation. A session that is already open is torn down
    /// first, so duplicate deliveries restart cleanly.
    pub fn open(&mut self, message: &ActivationMessage) -> SessionResult<()> {
        self.cleanup();
        self.start(&message.screenshot, &message.page_url, &message.page_title)
    }

    pub fn start(&mut self, screenshot: &str, page_url: &str, page_title: &str) -> SessionResult<()> {
        if self.state.is_active() || self.machine.phase().is_open() {
            tracing::warn!(page_url, "session start requested while another is active");
            return Err(SessionError::AlreadyActive);
        }
        let image = decode_data_url(screenshot).map_err(|err| {
            tracing::warn!(%err, "rejecting activation with unusable screenshot");
            SessionError::InvalidScreenshot(err)
        })?;

        if let Err(err) = self.build_session(image, screenshot, page_url, page_title) {
            tracing::warn!(%err, "session start failed; tearing down");
            self.cleanup();
            return Err(err);
        }
        Ok(())
    }

    fn build_session(
        &mut self,
        image: RgbaImage,
        screenshot: &str,
        page_url: &str,
        page_title: &str,
    ) -> SessionResult<()> {
        self.state.page_url = page_url.to_string();
        self.state.page_title = page_title.to_string();
        self.state.screenshot_data_url = screenshot.to_string();
        self.controls = default_controls(&self.config);

        let bounds = ImageBounds::new(image.width(), image.height());
        let chrome = CanvasChrome::from_config(&self.config);
        let viewport = self.host.viewport();
        let fit = fit_canvas(bounds, viewport, chrome).ok_or(SessionError::NoCanvasSpace {
            width: viewport.width,
            height: viewport.height,
        })?;
        let layout = layout_overlay(viewport, chrome, fit);
        let nodes = self.shell.mount(&mut self.host, layout)?;
        self.state.overlay_root = Some(nodes.root);
        self.state.description_field = Some(nodes.description_field);

        self.register_key_listener()?;

        DrawingEngine::new(
            &mut self.state,
            self.controls,
            &self.config.text_placeholder,
        )
        .init_canvas(&fit);
        self.host.attach_canvas(nodes.root, &fit, &image)?;
        self.state.screenshot = Some(image);

        self.machine.transition(SessionEvent::Open)?;
        tracing::info!(
            page_url,
            width = bounds.width,
            height = bounds.height,
            scale = fit.scale,
            "annotation session started"
        );
        self.sync_controls();
        Ok(())
    }

    fn register_key_listener(&mut self) -> SessionResult<()> {
        if let Some(previous) = self.state.keyboard_listener.take() {
            self.host.remove_key_listener(previous);
        }
        self.state.keyboard_listener = Some(self.host.add_key_listener()?);
        Ok(())
    }

    /// Tears the session down. Safe to call at any time, any number of
    /// times; disposal failures are logged and never stop the teardown.
    pub fn cleanup(&mut self) {
        let was_open = self.state.is_active() || self.machine.phase().is_open();

        if self.state.canvas.take().is_some() {
            if let Err(err) = self.host.detach_canvas() {
                tracing::warn!(%err, "drawing surface disposal failed; continuing cleanup");
            }
        }
        if let Some(root) = self.state.overlay_root.take() {
            self.shell.unmount(&mut self.host, root);
        }
        if let Some(listener) = self.state.keyboard_listener.take() {
            self.host.remove_key_listener(listener);
        }

        self.state.reset();
        self.toast.forget();
        if self.delivery.take().is_some() {
            tracing::debug!("dropping in-flight save result");
        }
        self.close_at = None;
        if self.machine.phase().is_open() {
            if let Err(err) = self.machine.transition(SessionEvent::Close) {
                tracing::warn!(%err, "session close transition rejected");
            }
        }
        self.shell.restore_scroll(&mut self.host);

        if was_open {
            tracing::info!("annotation session closed");
        }
    }

    /// Drives timers and the save worker. Returns the save result when one
    /// settled during this tick.
    pub fn tick(&mut self, now: Instant) -> Option<SaveOutcome> {
        self.toast.tick(&mut self.host, now);
        let outcome = self.poll_delivery(now);
        if self.close_at.is_some_and(|close_at| now >= close_at) {
            self.cleanup();
        }
        outcome
    }

    /// Whether drawing input applies right now. Input after a successful
    /// save is dropped while the confirmation is on screen.
    fn accepts_edits(&self) -> SessionResult<bool> {
        let phase = self.machine.phase();
        if !phase.is_open() {
            return Err(SessionError::NoActiveSession);
        }
        Ok(phase.accepts_edits())
    }

    fn engine(&mut self) -> DrawingEngine<'_> {
        DrawingEngine::new(&mut self.state, self.controls, &self.config.text_placeholder)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> SessionResult<()> {
        if !self.accepts_edits()? {
            return Ok(());
        }
        let point = ToolPoint::new(event.x, event.y);
        let mut engine = self.engine();
        match event.phase {
            PointerPhase::Down => engine.pointer_down(point)?,
            PointerPhase::Move => engine.pointer_move(point)?,
            PointerPhase::Up => {
                if let Some(id) = engine.pointer_up(point)? {
                    tracing::debug!(id, "shape finalized");
                }
            }
        }
        self.sync_controls();
        Ok(())
    }

    pub fn pointer(&mut self, phase: PointerPhase, x: i32, y: i32) -> SessionResult<()> {
        self.handle_pointer(PointerEvent { phase, x, y })
    }

    /// Routes input from the overlay's own controls.
    pub fn handle_ui(&mut self, event: UiEvent, now: Instant) -> SessionResult<()> {
        if !self.machine.phase().is_open() {
            return Err(SessionError::NoActiveSession);
        }
        let Some(event) = self.shell.apply_form_event(&mut self.host, event) else {
            return Ok(());
        };
        match event {
            UiEvent::SelectTool { tool } => self.select_tool(tool),
            UiEvent::ChangeStyle { change } => self.change_style(change),
            UiEvent::Undo => self.undo(),
            UiEvent::Delete => self.delete_selection(),
            UiEvent::Save => self.save(now).map(|_| ()),
            UiEvent::Cancel => {
                self.cleanup();
                Ok(())
            }
            UiEvent::EditTitle { .. }
            | UiEvent::EditDescription { .. }
            | UiEvent::SetType { .. }
            | UiEvent::SetPriority { .. }
            | UiEvent::Focus { .. }
            | UiEvent::Blur => Ok(()),
        }
    }

    pub fn select_tool(&mut self, tool: ToolKind) -> SessionResult<()> {
        if !self.accepts_edits()? {
            return Ok(());
        }
        self.engine().set_tool(tool)?;
        self.sync_controls();
        Ok(())
    }

    pub fn change_style(&mut self, change: StyleChange) -> SessionResult<()> {
        if !self.accepts_edits()? {
            return Ok(());
        }
        let restyled = self.engine().apply_style(change)?;
        change.apply_to_controls(&mut self.controls);
        tracing::debug!(?change, restyled, "style control changed");
        self.sync_controls();
        Ok(())
    }

    pub fn undo(&mut self) -> SessionResult<()> {
        if !self.accepts_edits()? {
            return Ok(());
        }
        self.engine().undo()?;
        self.sync_controls();
        Ok(())
    }

    pub fn delete_selection(&mut self) -> SessionResult<()> {
        if !self.accepts_edits()? {
            return Ok(());
        }
        self.engine().delete_selection()?;
        self.sync_controls();
        Ok(())
    }

    pub fn text_input(&mut self, event: TextInputEvent) -> SessionResult<TextInputAction> {
        if !self.accepts_edits()? {
            return Ok(TextInputAction::NoAction);
        }
        let action = self.engine().text_input(event)?;
        self.sync_controls();
        Ok(action)
    }

    /// Drains canvas events and repaints the palette and footer when the
    /// active tool, cursor, delete availability or save availability moved.
    fn sync_controls(&mut self) {
        let Some(canvas) = self.state.canvas.as_mut() else {
            return;
        };
        for event in canvas.drain_events() {
            tracing::trace!(?event, "canvas event");
        }
        let view = ControlsView {
            active_tool: self.state.current_tool,
            cursor: canvas.cursor(),
            delete_enabled: canvas.has_selection(),
            save_enabled: self.machine.phase() == SessionPhase::Active,
        };
        self.shell.render_controls(&mut self.host, view);
    }
}
