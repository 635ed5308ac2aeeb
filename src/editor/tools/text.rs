use serde::{Deserialize, Serialize};

use super::{font_weight_for_stroke, Color, StyleChange, StyleControls, ToolBounds, ToolPoint};

const LINE_HEIGHT_FACTOR: f64 = 1.16;
const CHAR_WIDTH_FACTOR: f64 = 0.6;
const MIN_TEXT_WIDTH: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    pub color: Color,
    pub size: u8,
    pub weight: u16,
}

impl TextOptions {
    pub fn from_controls(controls: &StyleControls) -> Self {
        Self {
            color: controls.color,
            size: controls.font_size,
            weight: controls.font_weight(),
        }
    }

    pub fn apply_change(&mut self, change: StyleChange) {
        match change {
            StyleChange::Color(color) => self.color = color,
            StyleChange::StrokeWidth(width) => self.weight = font_weight_for_stroke(width),
            StyleChange::FontSize(size) => self.size = size.max(6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub content: String,
    pub options: TextOptions,
    #[serde(skip)]
    cursor_chars: usize,
    #[serde(skip)]
    all_selected: bool,
    #[serde(skip)]
    pub editing: bool,
    #[serde(skip)]
    pub interactive: bool,
}

impl TextElement {
    pub fn new(id: u64, anchor: ToolPoint, options: TextOptions) -> Self {
        Self::with_text(id, anchor, String::new(), options)
    }

    pub fn with_text(
        id: u64,
        anchor: ToolPoint,
        text: impl Into<String>,
        options: TextOptions,
    ) -> Self {
        let content = text.into();
        let cursor_chars = content.chars().count();
        Self {
            id,
            x: anchor.x,
            y: anchor.y,
            content,
            options,
            cursor_chars,
            all_selected: false,
            editing: false,
            interactive: false,
        }
    }

    pub fn begin_editing(&mut self, select_all: bool) {
        self.editing = true;
        self.interactive = false;
        self.all_selected = select_all;
        self.move_cursor_to_end();
    }

    pub fn end_editing(&mut self) {
        self.editing = false;
        self.all_selected = false;
    }

    pub const fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn select_all(&mut self) {
        self.all_selected = true;
        self.move_cursor_to_end();
    }

    fn take_selection(&mut self) -> bool {
        if !self.all_selected {
            return false;
        }
        self.all_selected = false;
        self.content.clear();
        self.cursor_chars = 0;
        true
    }

    pub fn insert_char(&mut self, c: char) {
        self.take_selection();
        let byte_index = self.byte_index_for_cursor(self.cursor_chars);
        self.content.insert(byte_index, c);
        self.cursor_chars = self.cursor_chars.saturating_add(1);
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_backward(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        if self.cursor_chars == 0 {
            return false;
        }
        let end = self.byte_index_for_cursor(self.cursor_chars);
        let start = self.byte_index_for_cursor(self.cursor_chars.saturating_sub(1));
        if start >= end || end > self.content.len() {
            return false;
        }
        self.content.drain(start..end);
        self.cursor_chars = self.cursor_chars.saturating_sub(1);
        true
    }

    pub fn cursor_chars(&self) -> usize {
        self.cursor_chars.min(self.content.chars().count())
    }

    pub fn move_cursor_left(&mut self) -> bool {
        self.all_selected = false;
        if self.cursor_chars() == 0 {
            return false;
        }
        self.cursor_chars = self.cursor_chars().saturating_sub(1);
        true
    }

    pub fn move_cursor_right(&mut self) -> bool {
        self.all_selected = false;
        let max_chars = self.content.chars().count();
        if self.cursor_chars() >= max_chars {
            return false;
        }
        self.cursor_chars = self.cursor_chars().saturating_add(1);
        true
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_chars = self.content.chars().count();
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn lines(&self) -> Vec<&str> {
        if self.content.is_empty() {
            vec![""]
        } else {
            self.content.split('\n').collect()
        }
    }

    pub fn line_height(&self) -> f64 {
        f64::from(self.options.size.max(1)) * LINE_HEIGHT_FACTOR
    }

    /// Layout estimate used for hit testing and marquee selection.
    pub fn bounds(&self) -> ToolBounds {
        let lines = self.lines();
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let char_width = f64::from(self.options.size.max(1)) * CHAR_WIDTH_FACTOR;
        let width = ((longest as f64 * char_width).ceil() as u32).max(MIN_TEXT_WIDTH);
        let height = (lines.len() as f64 * self.line_height()).ceil() as u32;
        ToolBounds::new(self.x, self.y, width, height.max(1))
    }

    fn byte_index_for_cursor(&self, cursor_chars: usize) -> usize {
        let cursor_chars = cursor_chars.min(self.content.chars().count());
        self.content
            .char_indices()
            .nth(cursor_chars)
            .map(|(index, _)| index)
            .unwrap_or(self.content.len())
    }
}
