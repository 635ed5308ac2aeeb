use serde::{Deserialize, Serialize};

use super::{StrokeStyle, ToolBounds, ToolPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectangleElement {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub style: StrokeStyle,
    #[serde(skip)]
    pub interactive: bool,
}

impl RectangleElement {
    pub fn new(id: u64, anchor: ToolPoint, style: StrokeStyle) -> Self {
        Self {
            id,
            x: anchor.x,
            y: anchor.y,
            width: 0,
            height: 0,
            style,
            interactive: false,
        }
    }

    /// Spans the box between the drag anchor and the pointer, flipping the
    /// top-left corner when the drag goes left or up.
    pub fn span(&mut self, anchor: ToolPoint, current: ToolPoint) {
        let bounds = ToolBounds::from_corners(anchor, current);
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    pub const fn bounds(&self) -> ToolBounds {
        ToolBounds::new(self.x, self.y, self.width, self.height)
    }

    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
