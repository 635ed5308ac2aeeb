use std::time::Instant;

use serde::Deserialize;

use super::{SessionController, SessionResult};
use crate::input::{
    resolve_shortcut, text_input_for_key, InputContext, ShortcutAction, ShortcutKey,
    ShortcutModifiers, TextInputAction,
};
use crate::overlay::OverlayHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KeyPress {
    pub key: ShortcutKey,
    #[serde(default)]
    pub modifiers: ShortcutModifiers,
}

impl KeyPress {
    pub const fn plain(key: ShortcutKey) -> Self {
        Self {
            key,
            modifiers: ShortcutModifiers::new(false, false, false),
        }
    }

    pub const fn command(key: ShortcutKey) -> Self {
        Self {
            key,
            modifiers: ShortcutModifiers::ctrl(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Text(TextInputAction),
    Shortcut(ShortcutAction),
}

impl<H: OverlayHost> SessionController<H> {
    /// Entry point of the global key listener. Keys go to the inline text
    /// editor while a text object is being edited, and are shortcuts
    /// otherwise unless a form field has focus.
    pub fn handle_key(&mut self, press: KeyPress, now: Instant) -> SessionResult<KeyOutcome> {
        if !self.machine.phase().is_open() {
            return Ok(KeyOutcome::Ignored);
        }

        if self.is_editing_text() {
            let Some(event) = text_input_for_key(press.key, press.modifiers) else {
                return Ok(KeyOutcome::Ignored);
            };
            return Ok(KeyOutcome::Text(self.text_input(event)?));
        }

        let context = InputContext {
            session_open: true,
            text_field_focused: self.shell.text_field_focused(),
            text_editing: false,
        };
        let Some(action) = resolve_shortcut(press.key, press.modifiers, context) else {
            return Ok(KeyOutcome::Ignored);
        };
        tracing::debug!(?action, "shortcut");
        self.dispatch_shortcut(action, now)?;
        Ok(KeyOutcome::Shortcut(action))
    }

    fn dispatch_shortcut(&mut self, action: ShortcutAction, now: Instant) -> SessionResult<()> {
        match action {
            ShortcutAction::CloseRequested => self.cleanup(),
            ShortcutAction::Save => {
                self.save(now)?;
            }
            ShortcutAction::Undo => self.undo()?,
            ShortcutAction::DeleteSelection => self.delete_selection()?,
            ShortcutAction::EnterSelect
            | ShortcutAction::EnterArrow
            | ShortcutAction::EnterRectangle
            | ShortcutAction::EnterEllipse
            | ShortcutAction::EnterText => {
                if let Some(tool) = action.tool() {
                    self.select_tool(tool)?;
                }
            }
        }
        Ok(())
    }
}
