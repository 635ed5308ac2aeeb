use serde::{Deserialize, Serialize};

use super::{Color, StrokeStyle, ToolBounds, ToolPoint};

const HEAD_SIZE_PER_STROKE: f64 = 4.0;
const HEAD_MIN_SIZE: f64 = 8.0;

/// Triangular head of a finalized arrow, rotated to the line heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowHead {
    pub tip: ToolPoint,
    pub angle_degrees: f64,
    pub size: f64,
    pub fill: Color,
    pub stroke: Color,
}

impl ArrowHead {
    pub fn for_line(start: ToolPoint, end: ToolPoint, style: StrokeStyle) -> Self {
        Self {
            tip: end,
            angle_degrees: heading_degrees(start, end),
            size: head_size_for_stroke(style.width),
            fill: style.color,
            stroke: style.color,
        }
    }

    /// Tip, left and right corners in canvas coordinates.
    pub fn vertices(&self) -> [(f64, f64); 3] {
        let angle = self.angle_degrees.to_radians();
        let (ux, uy) = (angle.cos(), angle.sin());
        let (px, py) = (-uy, ux);
        let tip_x = f64::from(self.tip.x);
        let tip_y = f64::from(self.tip.y);
        let base_x = tip_x - ux * self.size;
        let base_y = tip_y - uy * self.size;
        let half = self.size / 2.0;
        [
            (tip_x, tip_y),
            (base_x + px * half, base_y + py * half),
            (base_x - px * half, base_y - py * half),
        ]
    }
}

/// Line plus head, selected and restyled as a single unit. A pending arrow
/// (still being dragged) has no head yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowElement {
    pub id: u64,
    pub start: ToolPoint,
    pub end: ToolPoint,
    pub style: StrokeStyle,
    pub head: Option<ArrowHead>,
    #[serde(skip)]
    pub interactive: bool,
}

impl ArrowElement {
    pub fn pending(id: u64, anchor: ToolPoint, style: StrokeStyle) -> Self {
        Self {
            id,
            start: anchor,
            end: anchor,
            style,
            head: None,
            interactive: false,
        }
    }

    pub fn finalized(id: u64, start: ToolPoint, end: ToolPoint, style: StrokeStyle) -> Self {
        Self {
            id,
            start,
            end,
            style,
            head: Some(ArrowHead::for_line(start, end, style)),
            interactive: false,
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.head.is_none()
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Restyles line and head together.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
        if let Some(head) = self.head.as_mut() {
            head.fill = style.color;
            head.stroke = style.color;
            head.size = head_size_for_stroke(style.width);
        }
    }

    pub fn translate(&mut self, delta_x: i32, delta_y: i32) {
        self.start = self.start.offset(delta_x, delta_y);
        self.end = self.end.offset(delta_x, delta_y);
        if let Some(head) = self.head.as_mut() {
            head.tip = head.tip.offset(delta_x, delta_y);
        }
    }

    pub fn bounds(&self) -> ToolBounds {
        let line = ToolBounds::from_corners(self.start, self.end);
        let Some(head) = self.head else {
            return line;
        };
        let vertices = head.vertices();
        let min_x = vertices.iter().map(|v| v.0).fold(f64::from(line.x), f64::min);
        let min_y = vertices.iter().map(|v| v.1).fold(f64::from(line.y), f64::min);
        let max_x = vertices.iter().map(|v| v.0).fold(line.right() as f64, f64::max);
        let max_y = vertices.iter().map(|v| v.1).fold(line.bottom() as f64, f64::max);
        ToolBounds::from_corners(
            ToolPoint::new(min_x.floor() as i32, min_y.floor() as i32),
            ToolPoint::new(max_x.ceil() as i32, max_y.ceil() as i32),
        )
    }
}

pub fn heading_degrees(start: ToolPoint, end: ToolPoint) -> f64 {
    let dx = f64::from(end.x) - f64::from(start.x);
    let dy = f64::from(end.y) - f64::from(start.y);
    dy.atan2(dx).to_degrees()
}

fn head_size_for_stroke(width: u8) -> f64 {
    (f64::from(width.max(1)) * HEAD_SIZE_PER_STROKE).max(HEAD_MIN_SIZE)
}
