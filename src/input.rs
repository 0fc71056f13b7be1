//! Keyboard input mapping
//!
//! Turns winit logical keys into side-effect-free actions, then applies
//! them to the text buffer.

use rush_core::TextBuffer;
use winit::keyboard::{Key, ModifiersState, NamedKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Typed text
    Insert(String),
    Newline,
    Backspace,
    Quit,
}

impl InputAction {
    /// Map a pressed key. Text typed with Ctrl/Alt/Super held is ignored.
    pub fn from_key(key: &Key, modifiers: ModifiersState) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Escape) => Some(Self::Quit),
            Key::Named(NamedKey::Enter) => Some(Self::Newline),
            Key::Named(NamedKey::Backspace) => Some(Self::Backspace),
            Key::Named(NamedKey::Space) if !has_command_modifier(modifiers) => {
                Some(Self::Insert(" ".to_string()))
            }
            Key::Character(text) if !has_command_modifier(modifiers) => {
                let printable: String = text.chars().filter(|c| !c.is_control()).collect();
                if printable.is_empty() {
                    None
                } else {
                    Some(Self::Insert(printable))
                }
            }
            _ => None,
        }
    }

    /// Apply to the buffer. Returns true if the content changed.
    pub fn apply(&self, buffer: &mut TextBuffer) -> bool {
        match self {
            Self::Insert(text) => {
                buffer.push_str(text);
                true
            }
            Self::Newline => {
                buffer.newline();
                true
            }
            Self::Backspace => buffer.backspace().is_some(),
            Self::Quit => false,
        }
    }
}

fn has_command_modifier(modifiers: ModifiersState) -> bool {
    modifiers.control_key() || modifiers.alt_key() || modifiers.super_key()
}
