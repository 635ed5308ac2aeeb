mod arrow;
mod ellipse;
mod operations;
mod query;
mod rectangle;
mod selection;
mod style;
mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::geometry::{Color, ImageBounds, ToolBounds, ToolPoint};
pub use arrow::{heading_degrees, ArrowElement, ArrowHead};
pub use ellipse::EllipseElement;
pub use operations::{PendingShape, TextExit};
pub use rectangle::RectangleElement;
pub use selection::{SelectGesture, SelectPointerOutcome};
pub use style::{
    font_weight_for_stroke, StrokeStyle, StyleChange, StyleControls, FONT_WEIGHT_MEDIUM,
    FONT_WEIGHT_THICK, FONT_WEIGHT_THIN,
};
pub use text::{TextElement, TextOptions};

/// Extra slack around an object's bounds when hit testing a click.
const HIT_SLOP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Select,
    #[default]
    Arrow,
    Rectangle,
    Ellipse,
    Text,
}

impl ToolKind {
    pub const ALL: [Self; 5] = [
        Self::Select,
        Self::Arrow,
        Self::Rectangle,
        Self::Ellipse,
        Self::Text,
    ];

    pub const fn is_drawing_tool(self) -> bool {
        !matches!(self, Self::Select)
    }

    pub const fn cursor(self) -> CanvasCursor {
        match self {
            Self::Select => CanvasCursor::Default,
            Self::Text => CanvasCursor::Text,
            Self::Arrow | Self::Rectangle | Self::Ellipse => CanvasCursor::Crosshair,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::Arrow => "Arrow",
            Self::Rectangle => "Rectangle",
            Self::Ellipse => "Ellipse",
            Self::Text => "Text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasCursor {
    #[default]
    Default,
    Crosshair,
    Text,
}

/// Notifications the canvas queues for whoever keeps dependent UI in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    ObjectAdded(u64),
    ObjectRemoved(u64),
    SelectionChanged,
    TextEditingExited { id: u64, kept: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolObject {
    Rectangle(RectangleElement),
    Ellipse(EllipseElement),
    Arrow(ArrowElement),
    Text(TextElement),
}

impl ToolObject {
    pub const fn id(&self) -> u64 {
        match self {
            Self::Rectangle(rectangle) => rectangle.id,
            Self::Ellipse(ellipse) => ellipse.id,
            Self::Arrow(arrow) => arrow.id,
            Self::Text(text) => text.id,
        }
    }

    pub fn bounds(&self) -> ToolBounds {
        match self {
            Self::Rectangle(rectangle) => rectangle.bounds(),
            Self::Ellipse(ellipse) => ellipse.bounds(),
            Self::Arrow(arrow) => arrow.bounds(),
            Self::Text(text) => text.bounds(),
        }
    }

    pub const fn is_interactive(&self) -> bool {
        match self {
            Self::Rectangle(rectangle) => rectangle.interactive,
            Self::Ellipse(ellipse) => ellipse.interactive,
            Self::Arrow(arrow) => arrow.interactive,
            Self::Text(text) => text.interactive,
        }
    }

    fn set_interactive(&mut self, interactive: bool) {
        match self {
            Self::Rectangle(rectangle) => rectangle.interactive = interactive,
            Self::Ellipse(ellipse) => ellipse.interactive = interactive,
            Self::Arrow(arrow) => arrow.interactive = interactive,
            Self::Text(text) => text.interactive = interactive && !text.editing,
        }
    }

    fn translate(&mut self, delta_x: i32, delta_y: i32) {
        match self {
            Self::Rectangle(rectangle) => {
                rectangle.x = rectangle.x.saturating_add(delta_x);
                rectangle.y = rectangle.y.saturating_add(delta_y);
            }
            Self::Ellipse(ellipse) => ellipse.center = ellipse.center.offset(delta_x, delta_y),
            Self::Arrow(arrow) => arrow.translate(delta_x, delta_y),
            Self::Text(text) => {
                text.x = text.x.saturating_add(delta_x);
                text.y = text.y.saturating_add(delta_y);
            }
        }
    }

    /// Dispatches a control edit on the object's variant. Font size only
    /// affects text; arrows restyle line and head together.
    fn apply_style(&mut self, change: StyleChange) -> bool {
        match self {
            Self::Rectangle(rectangle) => {
                let before = rectangle.style;
                rectangle.style = change.restyle_stroke(before);
                rectangle.style != before
            }
            Self::Ellipse(ellipse) => {
                let before = ellipse.style;
                ellipse.style = change.restyle_stroke(before);
                ellipse.style != before
            }
            Self::Arrow(arrow) => {
                if matches!(change, StyleChange::FontSize(_)) {
                    return false;
                }
                arrow.set_style(change.restyle_stroke(arrow.style));
                true
            }
            Self::Text(text) => {
                let before = text.options;
                text.options.apply_change(change);
                text.options != before
            }
        }
    }

    fn hit(&self, point: ToolPoint) -> bool {
        self.bounds().inflate(HIT_SLOP).contains(point)
    }

    fn as_text(&self) -> Option<&TextElement> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_arrow(&self) -> Option<&ArrowElement> {
        match self {
            Self::Arrow(arrow) => Some(arrow),
            _ => None,
        }
    }

    pub fn as_rectangle(&self) -> Option<&RectangleElement> {
        match self {
            Self::Rectangle(rectangle) => Some(rectangle),
            _ => None,
        }
    }

    pub fn as_ellipse(&self) -> Option<&EllipseElement> {
        match self {
            Self::Ellipse(ellipse) => Some(ellipse),
            _ => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("no drawing surface is active")]
    NoCanvas,
    #[error("object {0} not found on the canvas")]
    ObjectNotFound(u64),
    #[error("object {0} is not a shape under construction")]
    NotPending(u64),
    #[error("tool `{}` does not draw shapes", .0.label())]
    NotADrawingTool(ToolKind),
    #[error("object {0} is not a text object")]
    NotText(u64),
}

/// The drawing surface: a displayed screenshot plus the vector objects
/// layered on it, in insertion order (last is topmost).
#[derive(Debug, Clone)]
pub struct Canvas {
    display: ImageBounds,
    objects: Vec<ToolObject>,
    next_id: u64,
    selection: Vec<u64>,
    selection_enabled: bool,
    editing_text: Option<u64>,
    gesture: Option<SelectGesture>,
    cursor: CanvasCursor,
    events: Vec<CanvasEvent>,
}

impl Canvas {
    pub fn new(display: ImageBounds) -> Self {
        Self {
            display,
            objects: Vec::new(),
            next_id: 1,
            selection: Vec::new(),
            selection_enabled: false,
            editing_text: None,
            gesture: None,
            cursor: CanvasCursor::Default,
            events: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn push_object(&mut self, mut object: ToolObject, interactive: bool) -> u64 {
        let id = object.id();
        object.set_interactive(interactive);
        self.objects.push(object);
        self.events.push(CanvasEvent::ObjectAdded(id));
        id
    }

    fn find_object_mut<T>(
        &mut self,
        id: u64,
        projector: fn(&mut ToolObject) -> Option<&mut T>,
    ) -> Option<&mut T> {
        self.objects.iter_mut().find_map(|object| {
            if object.id() == id {
                projector(object)
            } else {
                None
            }
        })
    }

    fn find_object_ref<T>(&self, id: u64, projector: fn(&ToolObject) -> Option<&T>) -> Option<&T> {
        self.objects.iter().find_map(|object| {
            if object.id() == id {
                projector(object)
            } else {
                None
            }
        })
    }

    fn clear_active_state_for_object(&mut self, object: &ToolObject) {
        let id = object.id();
        if self.editing_text == Some(id) {
            self.editing_text = None;
        }
        let selected_before = self.selection.len();
        self.selection.retain(|selected| *selected != id);
        if self.selection.len() != selected_before {
            self.events.push(CanvasEvent::SelectionChanged);
        }
    }

    pub const fn display(&self) -> ImageBounds {
        self.display
    }

    pub const fn cursor(&self) -> CanvasCursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CanvasCursor) {
        self.cursor = cursor;
    }

    pub fn objects(&self) -> &[ToolObject] {
        &self.objects
    }

    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }
}
