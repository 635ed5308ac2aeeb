use serde::Deserialize;

use crate::editor::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, meta: bool, shift: bool) -> Self {
        Self { ctrl, meta, shift }
    }

    pub const fn ctrl() -> Self {
        Self::new(true, false, false)
    }

    pub const fn meta() -> Self {
        Self::new(false, true, false)
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub const fn command(self) -> bool {
        self.ctrl || self.meta
    }

    pub const fn is_empty(self) -> bool {
        !self.ctrl && !self.meta && !self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub session_open: bool,
    /// Focus is inside one of the overlay's form fields.
    pub text_field_focused: bool,
    /// A text object on the canvas is in inline-edit mode.
    pub text_editing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    CloseRequested,
    Save,
    Undo,
    DeleteSelection,
    EnterSelect,
    EnterArrow,
    EnterRectangle,
    EnterEllipse,
    EnterText,
}

impl ShortcutAction {
    pub const fn tool(self) -> Option<ToolKind> {
        match self {
            Self::EnterSelect => Some(ToolKind::Select),
            Self::EnterArrow => Some(ToolKind::Arrow),
            Self::EnterRectangle => Some(ToolKind::Rectangle),
            Self::EnterEllipse => Some(ToolKind::Ellipse),
            Self::EnterText => Some(ToolKind::Text),
            Self::CloseRequested | Self::Save | Self::Undo | Self::DeleteSelection => None,
        }
    }
}

fn resolve_tool_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Character('s') => Some(ShortcutAction::EnterSelect),
        ShortcutKey::Character('a') => Some(ShortcutAction::EnterArrow),
        ShortcutKey::Character('r') => Some(ShortcutAction::EnterRectangle),
        ShortcutKey::Character('e') => Some(ShortcutAction::EnterEllipse),
        ShortcutKey::Character('t') => Some(ShortcutAction::EnterText),
        _ => None,
    }
}

fn normalize_key(key: ShortcutKey) -> ShortcutKey {
    match key {
        ShortcutKey::Character(c) => ShortcutKey::Character(c.to_ascii_lowercase()),
        other => other,
    }
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if !context.session_open || context.text_field_focused || context.text_editing {
        return None;
    }

    match (key, modifiers.command()) {
        (ShortcutKey::Escape, _) => Some(ShortcutAction::CloseRequested),
        (ShortcutKey::Character(_), true) => match normalize_key(key) {
            ShortcutKey::Character('s') => Some(ShortcutAction::Save),
            ShortcutKey::Character('z') if !modifiers.shift => Some(ShortcutAction::Undo),
            _ => None,
        },
        (ShortcutKey::Delete | ShortcutKey::Backspace, false) => {
            Some(ShortcutAction::DeleteSelection)
        }
        (_, false) if modifiers.is_empty() => resolve_tool_shortcut(key),
        _ => None,
    }
}
