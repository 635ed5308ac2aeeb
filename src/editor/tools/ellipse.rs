use serde::{Deserialize, Serialize};

use super::{StrokeStyle, ToolBounds, ToolPoint};

/// Ellipse anchored at its center: the pointer-down point stays the center
/// while the drag sets the radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EllipseElement {
    pub id: u64,
    pub center: ToolPoint,
    pub radius_x: u32,
    pub radius_y: u32,
    pub style: StrokeStyle,
    #[serde(skip)]
    pub interactive: bool,
}

impl EllipseElement {
    pub fn new(id: u64, center: ToolPoint, style: StrokeStyle) -> Self {
        Self {
            id,
            center,
            radius_x: 0,
            radius_y: 0,
            style,
            interactive: false,
        }
    }

    pub fn span(&mut self, anchor: ToolPoint, current: ToolPoint) {
        self.center = anchor;
        self.radius_x = axis_distance(anchor.x, current.x);
        self.radius_y = axis_distance(anchor.y, current.y);
    }

    pub fn bounds(&self) -> ToolBounds {
        let rx = i32::try_from(self.radius_x).unwrap_or(i32::MAX);
        let ry = i32::try_from(self.radius_y).unwrap_or(i32::MAX);
        ToolBounds::new(
            self.center.x.saturating_sub(rx),
            self.center.y.saturating_sub(ry),
            self.radius_x.saturating_mul(2),
            self.radius_y.saturating_mul(2),
        )
    }

    pub const fn is_degenerate(&self) -> bool {
        self.radius_x == 0 && self.radius_y == 0
    }
}

fn axis_distance(a: i32, b: i32) -> u32 {
    u32::try_from((i64::from(a) - i64::from(b)).unsigned_abs()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;

    #[test]
    fn span_keeps_center_at_anchor_for_any_drag_direction() {
        let style = StrokeStyle::new(Color::new(0, 0, 255), 2);
        let mut ellipse = EllipseElement::new(3, ToolPoint::new(100, 100), style);

        ellipse.span(ToolPoint::new(100, 100), ToolPoint::new(60, 130));
        assert_eq!(ellipse.center, ToolPoint::new(100, 100));
        assert_eq!((ellipse.radius_x, ellipse.radius_y), (40, 30));
        assert_eq!(ellipse.bounds(), ToolBounds::new(60, 70, 80, 60));
    }

    #[test]
    fn flat_ellipse_is_still_visible_but_point_ellipse_is_degenerate() {
        let style = StrokeStyle::new(Color::new(0, 0, 255), 2);
        let mut ellipse = EllipseElement::new(3, ToolPoint::new(10, 10), style);
        assert!(ellipse.is_degenerate());

        ellipse.span(ToolPoint::new(10, 10), ToolPoint::new(30, 10));
        assert!(!ellipse.is_degenerate());
    }
}
