use serde::{Deserialize, Serialize};

use super::Color;

pub const FONT_WEIGHT_THIN: u16 = 400;
pub const FONT_WEIGHT_MEDIUM: u16 = 600;
pub const FONT_WEIGHT_THICK: u16 = 700;

const THIN_STROKE_MAX: u8 = 2;
const MEDIUM_STROKE_MAX: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: u8,
}

impl StrokeStyle {
    pub const fn new(color: Color, width: u8) -> Self {
        Self {
            color,
            width: clamp_stroke_width(width),
        }
    }
}

/// Live values of the overlay's color / stroke-width / font-size controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleControls {
    pub color: Color,
    pub stroke_width: u8,
    pub font_size: u8,
}

impl StyleControls {
    pub const fn new(color: Color, stroke_width: u8, font_size: u8) -> Self {
        Self {
            color,
            stroke_width: clamp_stroke_width(stroke_width),
            font_size: clamp_font_size(font_size),
        }
    }

    pub const fn stroke(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.stroke_width)
    }

    pub const fn font_weight(&self) -> u16 {
        font_weight_for_stroke(self.stroke_width)
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_stroke_width(&mut self, width: u8) {
        self.stroke_width = clamp_stroke_width(width);
    }

    pub fn set_font_size(&mut self, size: u8) {
        self.font_size = clamp_font_size(size);
    }
}

/// A single control edit, applied live to every selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "control", content = "value", rename_all = "snake_case")]
pub enum StyleChange {
    Color(Color),
    StrokeWidth(u8),
    FontSize(u8),
}

impl StyleChange {
    pub fn restyle_stroke(self, style: StrokeStyle) -> StrokeStyle {
        match self {
            Self::Color(color) => StrokeStyle::new(color, style.width),
            Self::StrokeWidth(width) => StrokeStyle::new(style.color, width),
            Self::FontSize(_) => style,
        }
    }

    pub fn apply_to_controls(self, controls: &mut StyleControls) {
        match self {
            Self::Color(color) => controls.set_color(color),
            Self::StrokeWidth(width) => controls.set_stroke_width(width),
            Self::FontSize(size) => controls.set_font_size(size),
        }
    }
}

/// Coarse thin / medium / thick mapping from stroke width to text weight.
pub const fn font_weight_for_stroke(width: u8) -> u16 {
    if width <= THIN_STROKE_MAX {
        FONT_WEIGHT_THIN
    } else if width <= MEDIUM_STROKE_MAX {
        FONT_WEIGHT_MEDIUM
    } else {
        FONT_WEIGHT_THICK
    }
}

const fn clamp_stroke_width(width: u8) -> u8 {
    if width == 0 {
        1
    } else {
        width
    }
}

const fn clamp_font_size(size: u8) -> u8 {
    if size < 6 {
        6
    } else {
        size
    }
}
