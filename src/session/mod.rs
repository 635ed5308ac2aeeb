//! The single mutable model behind an open overlay.

use image::RgbaImage;

use crate::editor::{Canvas, ToolKind, ToolPoint};
use crate::overlay::{ListenerId, NodeId};

/// Everything one open overlay owns. Created empty, filled by
/// `SessionController::start`, and put back to `Default` on cleanup.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub canvas: Option<Canvas>,
    pub overlay_root: Option<NodeId>,
    pub description_field: Option<NodeId>,
    pub keyboard_listener: Option<ListenerId>,
    pub current_tool: ToolKind,
    pub is_drawing: bool,
    pub start_x: i32,
    pub start_y: i32,
    pub pending_object: Option<u64>,
    pub page_url: String,
    pub page_title: String,
    pub screenshot_data_url: String,
    pub screenshot: Option<RgbaImage>,
    pub canvas_scale: f64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            canvas: None,
            overlay_root: None,
            description_field: None,
            keyboard_listener: None,
            current_tool: ToolKind::Arrow,
            is_drawing: false,
            start_x: 0,
            start_y: 0,
            pending_object: None,
            page_url: String::new(),
            page_title: String::new(),
            screenshot_data_url: String::new(),
            screenshot: None,
            canvas_scale: 1.0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.canvas.is_some() || self.overlay_root.is_some()
    }

    pub fn drag_anchor(&self) -> ToolPoint {
        ToolPoint::new(self.start_x, self.start_y)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when every field is back at its initial value.
    pub fn is_pristine(&self) -> bool {
        self.canvas.is_none()
            && self.overlay_root.is_none()
            && self.description_field.is_none()
            && self.keyboard_listener.is_none()
            && self.current_tool == ToolKind::Arrow
            && !self.is_drawing
            && self.start_x == 0
            && self.start_y == 0
            && self.pending_object.is_none()
            && self.page_url.is_empty()
            && self.page_title.is_empty()
            && self.screenshot_data_url.is_empty()
            && self.screenshot.is_none()
            && (self.canvas_scale - 1.0).abs() < f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ImageBounds;

    #[test]
    fn new_state_is_idle_with_arrow_tool() {
        let state = SessionState::new();
        assert!(!state.is_active());
        assert_eq!(state.current_tool, ToolKind::Arrow);
        assert!(state.is_pristine());
    }

    #[test]
    fn reset_restores_every_field() {
        let mut state = SessionState::new();
        state.canvas = Some(Canvas::new(ImageBounds::new(10, 10)));
        state.overlay_root = Some(NodeId(1));
        state.keyboard_listener = Some(ListenerId(2));
        state.current_tool = ToolKind::Text;
        state.is_drawing = true;
        state.start_x = 5;
        state.pending_object = Some(9);
        state.page_url = "https://example.com".to_string();
        state.canvas_scale = 0.5;
        assert!(state.is_active());

        state.reset();
        assert!(state.is_pristine());
    }
}
