use serde::Deserialize;

use super::{ShortcutKey, ShortcutModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputEvent {
    Character(char),
    Backspace,
    Enter,
    CursorLeft,
    CursorRight,
    SelectAll,
    /// Escape or Ctrl/Cmd+Enter: leave inline editing.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputAction {
    InsertCharacter(char),
    DeleteBackward,
    InsertLineBreak,
    MoveCursor,
    SelectAll,
    ExitEditing,
    NoTextTarget,
    NoAction,
}

pub fn resolve_text_input(event: TextInputEvent, has_text_target: bool) -> TextInputAction {
    if !has_text_target {
        return TextInputAction::NoTextTarget;
    }

    match event {
        TextInputEvent::Character(c) if c.is_control() => TextInputAction::NoAction,
        TextInputEvent::Character(c) => TextInputAction::InsertCharacter(c),
        TextInputEvent::Backspace => TextInputAction::DeleteBackward,
        TextInputEvent::Enter => TextInputAction::InsertLineBreak,
        TextInputEvent::CursorLeft | TextInputEvent::CursorRight => TextInputAction::MoveCursor,
        TextInputEvent::SelectAll => TextInputAction::SelectAll,
        TextInputEvent::Exit => TextInputAction::ExitEditing,
    }
}

/// Maps a raw key press to the inline text editor while a text object is being edited.
pub fn text_input_for_key(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<TextInputEvent> {
    match (key, modifiers.command()) {
        (ShortcutKey::Escape, _) | (ShortcutKey::Enter, true) => Some(TextInputEvent::Exit),
        (ShortcutKey::Enter, false) => Some(TextInputEvent::Enter),
        (ShortcutKey::Backspace, false) => Some(TextInputEvent::Backspace),
        (ShortcutKey::ArrowLeft, _) => Some(TextInputEvent::CursorLeft),
        (ShortcutKey::ArrowRight, _) => Some(TextInputEvent::CursorRight),
        (ShortcutKey::Character(c), true) if c.eq_ignore_ascii_case(&'a') => {
            Some(TextInputEvent::SelectAll)
        }
        (ShortcutKey::Character(c), false) => Some(TextInputEvent::Character(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_text_input_requires_a_target() {
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('x'), false),
            TextInputAction::NoTextTarget
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('x'), true),
            TextInputAction::InsertCharacter('x')
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('\u{7}'), true),
            TextInputAction::NoAction
        );
    }

    #[test]
    fn key_mapping_routes_escape_and_command_enter_to_exit() {
        assert_eq!(
            text_input_for_key(ShortcutKey::Escape, ShortcutModifiers::default()),
            Some(TextInputEvent::Exit)
        );
        assert_eq!(
            text_input_for_key(ShortcutKey::Enter, ShortcutModifiers::meta()),
            Some(TextInputEvent::Exit)
        );
        assert_eq!(
            text_input_for_key(ShortcutKey::Enter, ShortcutModifiers::default()),
            Some(TextInputEvent::Enter)
        );
    }

    #[test]
    fn key_mapping_keeps_plain_letters_as_text_and_ignores_other_command_keys() {
        assert_eq!(
            text_input_for_key(ShortcutKey::Character('s'), ShortcutModifiers::default()),
            Some(TextInputEvent::Character('s'))
        );
        assert_eq!(
            text_input_for_key(
                ShortcutKey::Character('S'),
                ShortcutModifiers::new(false, false, true)
            ),
            Some(TextInputEvent::Character('S'))
        );
        assert_eq!(
            text_input_for_key(ShortcutKey::Character('a'), ShortcutModifiers::ctrl()),
            Some(TextInputEvent::SelectAll)
        );
        assert_eq!(
            text_input_for_key(ShortcutKey::Character('s'), ShortcutModifiers::ctrl()),
            None
        );
        assert_eq!(
            text_input_for_key(ShortcutKey::Delete, ShortcutModifiers::default()),
            None
        );
    }
}
