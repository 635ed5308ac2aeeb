use serde::Deserialize;

use super::{HostResult, NodeId, OverlayHost, OverlayLayout, OverlayNodes};
use crate::annotation::{AnnotationFields, AnnotationType, Priority};
use crate::editor::{CanvasCursor, StyleChange, ToolKind};

const TITLE_COLUMNS: usize = 36;
const MAX_TITLE_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Title,
    Description,
}

/// Input from the overlay's own controls: tool palette, style controls,
/// metadata form and footer actions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiEvent {
    SelectTool { tool: ToolKind },
    ChangeStyle { change: StyleChange },
    EditTitle { value: String },
    EditDescription { value: String },
    SetType { kind: AnnotationType },
    SetPriority { priority: Priority },
    Focus { field: FormField },
    Blur,
    Undo,
    Delete,
    Save,
    Cancel,
}

/// What the host needs to paint the tool palette and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsView {
    pub active_tool: ToolKind,
    pub cursor: CanvasCursor,
    pub delete_enabled: bool,
    pub save_enabled: bool,
}

/// Chrome state around the canvas. Holds no editing logic; the controller
/// routes drawing input to the engine and form input here.
#[derive(Debug, Default)]
pub struct OverlayShell {
    layout: Option<OverlayLayout>,
    form: AnnotationFields,
    focused: Option<FormField>,
    title_rows: usize,
    scroll_suspended: bool,
    rendered: Option<ControlsView>,
}

impl OverlayShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspends page scroll and builds the overlay. Scroll is restored if
    /// the host cannot mount it.
    pub fn mount(
        &mut self,
        host: &mut dyn OverlayHost,
        layout: OverlayLayout,
    ) -> HostResult<OverlayNodes> {
        host.set_page_scroll_suspended(true);
        self.scroll_suspended = true;
        let nodes = match host.mount_overlay(&layout) {
            Ok(nodes) => nodes,
            Err(err) => {
                self.restore_scroll(host);
                return Err(err);
            }
        };
        self.layout = Some(layout);
        self.title_rows = 1;
        host.set_title_rows(self.title_rows);
        Ok(nodes)
    }

    /// Removes the overlay subtree and forgets form and focus state. Page
    /// scroll stays suspended until `restore_scroll`.
    pub fn unmount(&mut self, host: &mut dyn OverlayHost, root: NodeId) {
        host.remove_overlay(root);
        let scroll_suspended = self.scroll_suspended;
        *self = Self {
            scroll_suspended,
            ..Self::default()
        };
    }

    pub fn restore_scroll(&mut self, host: &mut dyn OverlayHost) {
        if self.scroll_suspended {
            host.set_page_scroll_suspended(false);
            self.scroll_suspended = false;
        }
    }

    pub fn layout(&self) -> Option<&OverlayLayout> {
        self.layout.as_ref()
    }

    pub fn form(&self) -> &AnnotationFields {
        &self.form
    }

    pub fn text_field_focused(&self) -> bool {
        self.focused.is_some()
    }

    pub fn title_rows(&self) -> usize {
        self.title_rows
    }

    /// Applies form and focus events. Returns the event back when it is
    /// meant for the editor or the controller.
    pub fn apply_form_event(
        &mut self,
        host: &mut dyn OverlayHost,
        event: UiEvent,
    ) -> Option<UiEvent> {
        match event {
            UiEvent::EditTitle { value } => {
                self.form.title = value;
                self.grow_title(host);
            }
            UiEvent::EditDescription { value } => self.form.description = value,
            UiEvent::SetType { kind } => self.form.kind = kind,
            UiEvent::SetPriority { priority } => self.form.priority = priority,
            UiEvent::Focus { field } => self.focused = Some(field),
            UiEvent::Blur => self.focused = None,
            other => return Some(other),
        }
        None
    }

    fn grow_title(&mut self, host: &mut dyn OverlayHost) {
        let rows = title_rows_for(&self.form.title);
        if rows != self.title_rows {
            self.title_rows = rows;
            host.set_title_rows(rows);
        }
    }

    /// Repaints controls only when something visible changed.
    pub fn render_controls(&mut self, host: &mut dyn OverlayHost, view: ControlsView) {
        if self.rendered == Some(view) {
            return;
        }
        host.render_controls(&view);
        self.rendered = Some(view);
    }

    pub fn rendered_controls(&self) -> Option<ControlsView> {
        self.rendered
    }
}

/// Rows the title textarea needs to show `title` without scrolling.
pub fn title_rows_for(title: &str) -> usize {
    let rows: usize = title
        .split('\n')
        .map(|line| line.chars().count().div_ceil(TITLE_COLUMNS).max(1))
        .sum();
    rows.clamp(1, MAX_TITLE_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{fit_canvas, CanvasChrome, ImageBounds, Viewport};
    use crate::overlay::{layout_overlay, HeadlessHost};

    fn layout() -> OverlayLayout {
        let viewport = Viewport::new(1600, 900);
        let chrome = CanvasChrome::default();
        layout_overlay(
            viewport,
            chrome,
            fit_canvas(ImageBounds::new(800, 600), viewport, chrome)
                .expect("canvas should fit"),
        )
    }

    #[test]
    fn mount_suspends_scroll_until_restored() {
        let mut host = HeadlessHost::new(Viewport::new(1600, 900));
        let mut shell = OverlayShell::new();
        let nodes = shell.mount(&mut host, layout()).expect("overlay should mount");
        assert!(host.scroll_suspended());
        assert_eq!(host.mounted_root(), Some(nodes.root));

        shell.unmount(&mut host, nodes.root);
        assert_eq!(host.mounted_root(), None);
        assert!(host.scroll_suspended());
        shell.restore_scroll(&mut host);
        assert!(!host.scroll_suspended());
        shell.restore_scroll(&mut host);
        assert!(!host.scroll_suspended());
    }

    #[test]
    fn failed_mount_restores_scroll() {
        let mut host = HeadlessHost::new(Viewport::new(1600, 900));
        host.fail_next_mount("detached document");
        let mut shell = OverlayShell::new();
        assert!(shell.mount(&mut host, layout()).is_err());
        assert!(!host.scroll_suspended());
    }

    #[test]
    fn form_events_are_consumed_and_others_passed_through() {
        let mut host = HeadlessHost::new(Viewport::new(1600, 900));
        let mut shell = OverlayShell::new();
        let events = [
            UiEvent::EditTitle {
                value: "Header misaligned".to_string(),
            },
            UiEvent::EditDescription {
                value: "Logo overlaps nav".to_string(),
            },
            UiEvent::SetType {
                kind: AnnotationType::Improvement,
            },
            UiEvent::SetPriority {
                priority: Priority::Critical,
            },
        ];
        for event in events {
            assert_eq!(shell.apply_form_event(&mut host, event), None);
        }
        assert_eq!(shell.form().title, "Header misaligned");
        assert_eq!(shell.form().kind, AnnotationType::Improvement);
        assert_eq!(shell.form().priority, Priority::Critical);

        assert_eq!(
            shell.apply_form_event(&mut host, UiEvent::Save),
            Some(UiEvent::Save)
        );
    }

    #[test]
    fn focus_tracking_follows_focus_and_blur() {
        let mut host = HeadlessHost::new(Viewport::new(1600, 900));
        let mut shell = OverlayShell::new();
        shell.apply_form_event(
            &mut host,
            UiEvent::Focus {
                field: FormField::Description,
            },
        );
        assert!(shell.text_field_focused());
        shell.apply_form_event(&mut host, UiEvent::Blur);
        assert!(!shell.text_field_focused());
    }

    #[test]
    fn title_grows_with_content_and_caps() {
        assert_eq!(title_rows_for(""), 1);
        assert_eq!(title_rows_for(&"x".repeat(36)), 1);
        assert_eq!(title_rows_for(&"x".repeat(37)), 2);
        assert_eq!(title_rows_for("one\ntwo\n"), 3);
        assert_eq!(title_rows_for(&"x".repeat(1000)), MAX_TITLE_ROWS);

        let mut host = HeadlessHost::new(Viewport::new(1600, 900));
        let mut shell = OverlayShell::new();
        shell.mount(&mut host, layout()).expect("overlay should mount");
        shell.apply_form_event(
            &mut host,
            UiEvent::EditTitle {
                value: "x".repeat(80),
            },
        );
        assert_eq!(shell.title_rows(), 3);
        assert_eq!(host.title_rows(), 3);
    }

    #[test]
    fn ui_events_parse_from_json() {
        let event: UiEvent = serde_json::from_str(r#"{"action":"select_tool","tool":"ellipse"}"#)
            .expect("tool event should parse");
        assert_eq!(
            event,
            UiEvent::SelectTool {
                tool: ToolKind::Ellipse
            }
        );
        let event: UiEvent = serde_json::from_str(
            r##"{"action":"change_style","change":{"control":"color","value":"#00ff00"}}"##,
        )
        .expect("style event should parse");
        assert!(matches!(
            event,
            UiEvent::ChangeStyle {
                change: StyleChange::Color(_)
            }
        ));
        let event: UiEvent =
            serde_json::from_str(r#"{"action":"save"}"#).expect("save event should parse");
        assert_eq!(event, UiEvent::Save);
    }

    #[test]
    fn controls_render_only_on_change() {
        let mut host = HeadlessHost::new(Viewport::new(1600, 900));
        let mut shell = OverlayShell::new();
        let view = ControlsView {
            active_tool: ToolKind::Arrow,
            cursor: CanvasCursor::Crosshair,
            delete_enabled: false,
            save_enabled: true,
        };
        shell.render_controls(&mut host, view);
        shell.render_controls(&mut host, view);
        assert_eq!(host.controls_renders(), 1);
        shell.render_controls(
            &mut host,
            ControlsView {
                delete_enabled: true,
                ..view
            },
        );
        assert_eq!(host.controls_renders(), 2);
        assert_eq!(host.controls().map(|view| view.delete_enabled), Some(true));
    }
}
