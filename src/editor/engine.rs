use super::tools::{PendingShape, SelectPointerOutcome, TextOptions};
use super::{
    Canvas, CanvasFit, StyleChange, StyleControls, TextExit, ToolError, ToolKind, ToolObject,
    ToolPoint,
};
use crate::input::{TextInputAction, TextInputEvent};
use crate::session::SessionState;

/// Tool state machine and pointer protocol over the session's canvas.
///
/// The engine is a short-lived view: the controller builds one per input
/// event with the live style controls.
pub struct DrawingEngine<'a> {
    state: &'a mut SessionState,
    controls: StyleControls,
    placeholder: &'a str,
}

impl<'a> DrawingEngine<'a> {
    pub fn new(state: &'a mut SessionState, controls: StyleControls, placeholder: &'a str) -> Self {
        Self {
            state,
            controls,
            placeholder,
        }
    }

    /// Creates the canvas for a fitted screenshot and applies the session's
    /// current tool before any input arrives.
    pub fn init_canvas(&mut self, fit: &CanvasFit) {
        self.state.canvas = Some(Canvas::new(fit.display));
        self.state.canvas_scale = fit.scale;
        tracing::info!(
            width = fit.original.width,
            height = fit.original.height,
            display_width = fit.display.width,
            display_height = fit.display.height,
            scale = fit.scale,
            "canvas initialized"
        );
        self.apply_tool(self.state.current_tool);
    }

    fn canvas_mut(&mut self) -> Result<&mut Canvas, ToolError> {
        self.state.canvas.as_mut().ok_or(ToolError::NoCanvas)
    }

    /// Switches the active tool. Any drag in flight is discarded and inline
    /// text editing is committed without the automatic switch to select.
    pub fn set_tool(&mut self, tool: ToolKind) -> Result<(), ToolError> {
        let canvas = self.state.canvas.as_mut().ok_or(ToolError::NoCanvas)?;
        if let Some(pending) = self.state.pending_object.take() {
            canvas.remove_object(pending);
            tracing::debug!(id = pending, "discarded shape under construction");
        }
        self.state.is_drawing = false;
        canvas.exit_text_editing();
        self.apply_tool(tool);
        Ok(())
    }

    fn apply_tool(&mut self, tool: ToolKind) {
        self.state.current_tool = tool;
        if let Some(canvas) = self.state.canvas.as_mut() {
            canvas.set_selection_enabled(tool == ToolKind::Select);
            canvas.set_cursor(tool.cursor());
        }
        tracing::debug!(tool = tool.label(), "tool selected");
    }

    pub fn pointer_down(&mut self, point: ToolPoint) -> Result<(), ToolError> {
        if self.state.canvas.is_none() {
            return Err(ToolError::NoCanvas);
        }
        if self.is_editing_text() {
            self.finish_text_editing();
            return Ok(());
        }

        let tool = self.state.current_tool;
        if tool == ToolKind::Select {
            let outcome = self.canvas_mut()?.select_pointer_down(point);
            if let SelectPointerOutcome::EditText(id) = outcome {
                tracing::debug!(id, "editing existing text");
            }
            return Ok(());
        }
        if tool == ToolKind::Text {
            let options = TextOptions::from_controls(&self.controls);
            let placeholder = self.placeholder;
            let id = self.canvas_mut()?.add_text_box(point, options, placeholder);
            tracing::debug!(id, x = point.x, y = point.y, "text box created");
            return Ok(());
        }

        if self.state.is_drawing {
            return Ok(());
        }
        let shape = PendingShape::for_tool(tool).ok_or(ToolError::NotADrawingTool(tool))?;
        let style = self.controls.stroke();
        let id = self.canvas_mut()?.begin_shape(shape, point, style);
        self.state.start_x = point.x;
        self.state.start_y = point.y;
        self.state.is_drawing = true;
        self.state.pending_object = Some(id);
        Ok(())
    }

    pub fn pointer_move(&mut self, point: ToolPoint) -> Result<(), ToolError> {
        let anchor = self.state.drag_anchor();
        let tool = self.state.current_tool;
        let drawing = self.state.is_drawing;
        let pending = self.state.pending_object;
        let canvas = self.canvas_mut()?;

        if tool == ToolKind::Select {
            canvas.select_pointer_move(point);
            return Ok(());
        }
        match (drawing, pending) {
            (true, Some(id)) => canvas.resize_shape(id, anchor, point),
            _ => Ok(()),
        }
    }

    pub fn pointer_up(&mut self, point: ToolPoint) -> Result<Option<u64>, ToolError> {
        let anchor = self.state.drag_anchor();
        let tool = self.state.current_tool;
        let canvas = self.state.canvas.as_mut().ok_or(ToolError::NoCanvas)?;

        if tool == ToolKind::Select {
            canvas.select_pointer_up(point);
            return Ok(None);
        }
        if !self.state.is_drawing {
            return Ok(None);
        }
        self.state.is_drawing = false;
        let Some(id) = self.state.pending_object.take() else {
            return Ok(None);
        };
        canvas.resize_shape(id, anchor, point)?;
        canvas.finish_shape(id)
    }

    /// Records a control edit and applies it to the current selection.
    pub fn apply_style(&mut self, change: StyleChange) -> Result<usize, ToolError> {
        change.apply_to_controls(&mut self.controls);
        let changed = self.canvas_mut()?.apply_style_to_selection(change);
        Ok(changed)
    }

    /// Removes the last added object. A drag in flight is aborted instead.
    pub fn undo(&mut self) -> Result<Option<ToolObject>, ToolError> {
        let pending = self.state.pending_object.take();
        self.state.is_drawing = false;
        let canvas = self.canvas_mut()?;
        if let Some(id) = pending {
            return Ok(canvas.remove_object(id));
        }
        let removed = canvas.pop_last_object();
        if let Some(object) = &removed {
            tracing::debug!(id = object.id(), "undo removed object");
        }
        Ok(removed)
    }

    pub fn delete_selection(&mut self) -> Result<Vec<ToolObject>, ToolError> {
        let removed = self.canvas_mut()?.remove_selected();
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "deleted selection");
        }
        Ok(removed)
    }

    pub fn is_editing_text(&self) -> bool {
        self.state
            .canvas
            .as_ref()
            .is_some_and(Canvas::is_editing_text)
    }

    pub fn text_input(&mut self, event: TextInputEvent) -> Result<TextInputAction, ToolError> {
        if event == TextInputEvent::Exit {
            return Ok(match self.finish_text_editing() {
                Some(_) => TextInputAction::ExitEditing,
                None => TextInputAction::NoTextTarget,
            });
        }
        Ok(self.canvas_mut()?.apply_text_input(event))
    }

    /// Ends inline editing the way a user does: kept text becomes a
    /// selectable object and the select tool takes over with it selected.
    pub fn finish_text_editing(&mut self) -> Option<TextExit> {
        let exit = self.state.canvas.as_mut()?.exit_text_editing()?;
        if exit.kept {
            self.apply_tool(ToolKind::Select);
            if let Some(canvas) = self.state.canvas.as_mut() {
                if let Err(err) = canvas.select(exit.id) {
                    tracing::warn!(%err, "edited text vanished before selection");
                }
            }
        }
        Some(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{fit_canvas, CanvasChrome, CanvasCursor, CanvasEvent, ImageBounds, Viewport};
    use crate::geometry::Color;

    const PLACEHOLDER: &str = "Type here";

    fn controls() -> StyleControls {
        StyleControls::new(Color::new(255, 59, 48), 3, 24)
    }

    fn active_state() -> SessionState {
        let mut state = SessionState::new();
        let fit = fit_canvas(
            ImageBounds::new(800, 600),
            Viewport::new(1920, 1080),
            CanvasChrome::default(),
        )
        .expect("default chrome should leave room for the canvas");
        DrawingEngine::new(&mut state, controls(), PLACEHOLDER).init_canvas(&fit);
        state
    }

    fn drag(engine: &mut DrawingEngine<'_>, from: (i32, i32), to: (i32, i32)) -> Option<u64> {
        engine
            .pointer_down(ToolPoint::new(from.0, from.1))
            .expect("pointer down should succeed");
        engine
            .pointer_move(ToolPoint::new(to.0, to.1))
            .expect("pointer move should succeed");
        engine
            .pointer_up(ToolPoint::new(to.0, to.1))
            .expect("pointer up should succeed")
    }

    fn canvas(state: &SessionState) -> &Canvas {
        state.canvas.as_ref().expect("canvas should exist")
    }

    #[test]
    fn init_applies_default_arrow_tool() {
        let state = active_state();
        assert_eq!(state.current_tool, ToolKind::Arrow);
        assert!((state.canvas_scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(canvas(&state).cursor(), CanvasCursor::Crosshair);
        assert!(!canvas(&state).selection_enabled());
    }

    #[test]
    fn rectangle_drag_tracks_state_and_normalizes() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Rectangle).expect("tool switch");
        engine
            .pointer_down(ToolPoint::new(50, 50))
            .expect("pointer down");
        engine
            .pointer_move(ToolPoint::new(10, 10))
            .expect("pointer move");
        let id = engine
            .pointer_up(ToolPoint::new(10, 10))
            .expect("pointer up")
            .expect("rectangle should be committed");
        assert!(!state.is_drawing);
        assert_eq!(state.pending_object, None);
        let rectangle = canvas(&state)
            .object(id)
            .and_then(ToolObject::as_rectangle)
            .expect("rectangle should exist");
        assert_eq!(
            (rectangle.x, rectangle.y, rectangle.width, rectangle.height),
            (10, 10, 40, 40)
        );
        assert_eq!(rectangle.style, controls().stroke());
    }

    #[test]
    fn drag_sets_drawing_flag_and_anchor() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Ellipse).expect("tool switch");
        engine
            .pointer_down(ToolPoint::new(100, 120))
            .expect("pointer down");
        assert!(state.is_drawing);
        assert_eq!((state.start_x, state.start_y), (100, 120));
        assert!(state.pending_object.is_some());
    }

    #[test]
    fn text_click_creates_editing_text_without_drawing() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Text).expect("tool switch");
        engine
            .pointer_down(ToolPoint::new(100, 100))
            .expect("pointer down");
        assert!(!state.is_drawing);
        let text = canvas(&state)
            .editing_text()
            .expect("text should be in edit mode");
        assert_eq!((text.x, text.y), (100, 100));
        assert_eq!(text.content, PLACEHOLDER);
        assert!(text.all_selected());

        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine
            .pointer_up(ToolPoint::new(100, 100))
            .expect("pointer up");
        assert!(!state.is_drawing);
    }

    #[test]
    fn exiting_text_edit_switches_to_select_with_text_selected() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Text).expect("tool switch");
        engine.pointer_down(ToolPoint::new(20, 20)).expect("pointer down");
        engine
            .text_input(TextInputEvent::Character('x'))
            .expect("typing");
        assert_eq!(
            engine.text_input(TextInputEvent::Exit).expect("exit"),
            TextInputAction::ExitEditing
        );

        assert_eq!(state.current_tool, ToolKind::Select);
        let canvas = canvas(&state);
        let id = canvas.objects()[0].id();
        assert_eq!(canvas.selection(), &[id]);
        assert!(canvas.objects()[0].is_interactive());
    }

    #[test]
    fn switching_tools_mid_drag_discards_pending_shape() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.pointer_down(ToolPoint::new(0, 0)).expect("pointer down");
        engine.pointer_move(ToolPoint::new(40, 40)).expect("pointer move");
        engine.set_tool(ToolKind::Select).expect("tool switch");

        assert!(!state.is_drawing);
        assert_eq!(state.pending_object, None);
        assert!(canvas(&state).is_empty());
    }

    #[test]
    fn every_tool_switch_leaves_exactly_one_consistent_mode() {
        let mut state = active_state();
        for tool in ToolKind::ALL.into_iter().chain(ToolKind::ALL.into_iter().rev()) {
            let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
            engine.set_tool(tool).expect("tool switch");
            assert_eq!(state.current_tool, tool);
            assert_eq!(canvas(&state).cursor(), tool.cursor());
            assert_eq!(
                canvas(&state).selection_enabled(),
                tool == ToolKind::Select
            );
        }
    }

    #[test]
    fn drawing_tool_switch_clears_selection() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Rectangle).expect("tool switch");
        let id = drag(&mut engine, (10, 10), (90, 90)).expect("rectangle");
        engine.set_tool(ToolKind::Select).expect("tool switch");
        engine.pointer_down(ToolPoint::new(50, 50)).expect("select click");
        engine.pointer_up(ToolPoint::new(50, 50)).expect("select release");
        assert_eq!(canvas(&state).selection(), &[id]);

        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Arrow).expect("tool switch");
        assert!(!canvas(&state).has_selection());
        assert!(!canvas(&state).objects()[0].is_interactive());
    }

    #[test]
    fn undo_mid_drag_aborts_the_drag() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Rectangle).expect("tool switch");
        let kept = drag(&mut engine, (0, 0), (20, 20)).expect("rectangle");
        engine.pointer_down(ToolPoint::new(30, 30)).expect("pointer down");
        let removed = engine.undo().expect("undo").expect("pending shape removed");
        assert_ne!(removed.id(), kept);
        assert!(!state.is_drawing);
        assert_eq!(canvas(&state).len(), 1);
    }

    #[test]
    fn style_change_updates_controls_and_selection() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        engine.set_tool(ToolKind::Rectangle).expect("tool switch");
        let id = drag(&mut engine, (10, 10), (90, 90)).expect("rectangle");
        engine.set_tool(ToolKind::Select).expect("tool switch");
        engine.pointer_down(ToolPoint::new(50, 50)).expect("select click");
        engine.pointer_up(ToolPoint::new(50, 50)).expect("select release");

        let blue = Color::new(0, 0, 255);
        assert_eq!(engine.apply_style(StyleChange::Color(blue)).expect("restyle"), 1);
        assert_eq!(engine.apply_style(StyleChange::FontSize(30)).expect("restyle"), 0);
        let rectangle = canvas(&state)
            .object(id)
            .and_then(ToolObject::as_rectangle)
            .expect("rectangle should exist");
        assert_eq!(rectangle.style.color, blue);
    }

    #[test]
    fn operations_without_canvas_report_no_canvas() {
        let mut state = SessionState::new();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        assert_eq!(engine.pointer_down(ToolPoint::new(0, 0)), Err(ToolError::NoCanvas));
        assert_eq!(engine.set_tool(ToolKind::Select), Err(ToolError::NoCanvas));
        assert!(engine.undo().is_err());
        assert_eq!(engine.finish_text_editing(), None);
    }

    #[test]
    fn undo_emits_removal_event() {
        let mut state = active_state();
        let mut engine = DrawingEngine::new(&mut state, controls(), PLACEHOLDER);
        let id = drag(&mut engine, (0, 0), (50, 0)).expect("arrow");
        engine.undo().expect("undo");
        let events = state
            .canvas
            .as_mut()
            .expect("canvas should exist")
            .drain_events();
        assert!(events.contains(&CanvasEvent::ObjectRemoved(id)));
    }
}
