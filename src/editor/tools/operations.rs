use super::*;
use crate::input::{resolve_text_input, TextInputAction, TextInputEvent};

/// Shape kinds built by a pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingShape {
    Rectangle,
    Ellipse,
    Arrow,
}

impl PendingShape {
    pub const fn for_tool(tool: ToolKind) -> Option<Self> {
        match tool {
            ToolKind::Rectangle => Some(Self::Rectangle),
            ToolKind::Ellipse => Some(Self::Ellipse),
            ToolKind::Arrow => Some(Self::Arrow),
            ToolKind::Select | ToolKind::Text => None,
        }
    }
}

/// Result of leaving inline text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExit {
    pub id: u64,
    pub kept: bool,
}

impl Canvas {
    /// Adds a zero-size, non-interactive shape anchored at `anchor`.
    pub fn begin_shape(&mut self, shape: PendingShape, anchor: ToolPoint, style: StrokeStyle) -> u64 {
        let id = self.allocate_id();
        let object = match shape {
            PendingShape::Rectangle => ToolObject::Rectangle(RectangleElement::new(id, anchor, style)),
            PendingShape::Ellipse => ToolObject::Ellipse(EllipseElement::new(id, anchor, style)),
            PendingShape::Arrow => ToolObject::Arrow(ArrowElement::pending(id, anchor, style)),
        };
        self.push_object(object, false)
    }

    pub fn resize_shape(
        &mut self,
        id: u64,
        anchor: ToolPoint,
        current: ToolPoint,
    ) -> Result<(), ToolError> {
        let object = self
            .objects
            .iter_mut()
            .find(|object| object.id() == id)
            .ok_or(ToolError::ObjectNotFound(id))?;
        match object {
            ToolObject::Rectangle(rectangle) => rectangle.span(anchor, current),
            ToolObject::Ellipse(ellipse) => ellipse.span(anchor, current),
            ToolObject::Arrow(arrow) if arrow.is_pending() => arrow.end = current,
            ToolObject::Arrow(_) | ToolObject::Text(_) => return Err(ToolError::NotPending(id)),
        }
        Ok(())
    }

    /// Finalizes a dragged shape. Returns the id of the committed object, or
    /// `None` when the drag never left its anchor and the shape was dropped.
    /// A pending arrow is replaced by a new composite line-plus-head object.
    pub fn finish_shape(&mut self, id: u64) -> Result<Option<u64>, ToolError> {
        let object = self
            .objects
            .iter()
            .find(|object| object.id() == id)
            .ok_or(ToolError::ObjectNotFound(id))?;

        let degenerate = match object {
            ToolObject::Rectangle(rectangle) => rectangle.is_degenerate(),
            ToolObject::Ellipse(ellipse) => ellipse.is_degenerate(),
            ToolObject::Arrow(arrow) if arrow.is_pending() => arrow.is_degenerate(),
            ToolObject::Arrow(_) | ToolObject::Text(_) => return Err(ToolError::NotPending(id)),
        };
        if degenerate {
            self.remove_object(id);
            tracing::debug!(id, "dropped zero-size shape");
            return Ok(None);
        }

        let pending_arrow = object.as_arrow().copied();
        match pending_arrow {
            Some(line) => {
                self.remove_object(id);
                let arrow_id = self.allocate_id();
                let arrow = ArrowElement::finalized(arrow_id, line.start, line.end, line.style);
                self.push_object(ToolObject::Arrow(arrow), false);
                tracing::debug!(id = arrow_id, "finalized arrow");
                Ok(Some(arrow_id))
            }
            None => {
                tracing::debug!(id, bounds = ?self.object(id).map(ToolObject::bounds), "finalized shape");
                Ok(Some(id))
            }
        }
    }

    /// Creates a text object at `at` showing `placeholder`, already in edit
    /// mode with the placeholder selected so the first keystroke replaces it.
    pub fn add_text_box(&mut self, at: ToolPoint, options: TextOptions, placeholder: &str) -> u64 {
        self.exit_text_editing();
        let id = self.allocate_id();
        let mut text = TextElement::with_text(id, at, placeholder, options);
        text.begin_editing(true);
        self.push_object(ToolObject::Text(text), false);
        self.editing_text = Some(id);
        self.replace_selection(vec![id]);
        id
    }

    pub fn enter_text_editing(&mut self, id: u64) -> Result<(), ToolError> {
        if self.editing_text == Some(id) {
            return Ok(());
        }
        if self.object(id).is_none() {
            return Err(ToolError::ObjectNotFound(id));
        }
        if self.get_text(id).is_none() {
            return Err(ToolError::NotText(id));
        }
        self.exit_text_editing();
        let text = self
            .get_text_mut(id)
            .ok_or(ToolError::ObjectNotFound(id))?;
        text.begin_editing(false);
        self.editing_text = Some(id);
        self.replace_selection(vec![id]);
        Ok(())
    }

    /// Leaves inline editing. Text left blank is removed from the canvas;
    /// anything else becomes a regular selectable object.
    pub fn exit_text_editing(&mut self) -> Option<TextExit> {
        let id = self.editing_text.take()?;
        let text = self.get_text_mut(id)?;
        let kept = !text.is_blank();
        if kept {
            text.end_editing();
            text.interactive = true;
        } else {
            self.remove_object(id);
        }
        self.events.push(CanvasEvent::TextEditingExited { id, kept });
        Some(TextExit { id, kept })
    }

    pub fn apply_text_input(&mut self, event: TextInputEvent) -> TextInputAction {
        let action = resolve_text_input(event, self.editing_text.is_some());

        let Some(target_id) = self.editing_text else {
            return action;
        };

        if matches!(action, TextInputAction::ExitEditing) {
            self.exit_text_editing();
            return TextInputAction::ExitEditing;
        }

        let Some(text) = self.get_text_mut(target_id) else {
            self.editing_text = None;
            return TextInputAction::NoTextTarget;
        };

        match action {
            TextInputAction::InsertCharacter(c) => {
                text.insert_char(c);
                TextInputAction::InsertCharacter(c)
            }
            TextInputAction::DeleteBackward => {
                if text.delete_backward() {
                    TextInputAction::DeleteBackward
                } else {
                    TextInputAction::NoAction
                }
            }
            TextInputAction::InsertLineBreak => {
                text.insert_newline();
                TextInputAction::InsertLineBreak
            }
            TextInputAction::MoveCursor => {
                let moved = match event {
                    TextInputEvent::CursorLeft => text.move_cursor_left(),
                    TextInputEvent::CursorRight => text.move_cursor_right(),
                    _ => false,
                };
                if moved {
                    TextInputAction::MoveCursor
                } else {
                    TextInputAction::NoAction
                }
            }
            TextInputAction::SelectAll => {
                text.select_all();
                TextInputAction::SelectAll
            }
            other => other,
        }
    }

    /// Removes the most recently added object, whatever tool created it.
    pub fn pop_last_object(&mut self) -> Option<ToolObject> {
        let object = self.objects.pop()?;
        self.clear_active_state_for_object(&object);
        self.events.push(CanvasEvent::ObjectRemoved(object.id()));
        Some(object)
    }

    pub fn remove_object(&mut self, id: u64) -> Option<ToolObject> {
        let index = self.objects.iter().position(|object| object.id() == id)?;
        let object = self.objects.remove(index);
        self.clear_active_state_for_object(&object);
        self.events.push(CanvasEvent::ObjectRemoved(id));
        Some(object)
    }
}
