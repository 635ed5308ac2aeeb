mod shortcut;
mod text_input;

pub use shortcut::{
    resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers,
};
pub use text_input::{resolve_text_input, text_input_for_key, TextInputAction, TextInputEvent};
