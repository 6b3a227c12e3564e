use iced::keyboard::{key::Named, Key, Modifiers};

use crate::Message;

/// Map a key press to an action.
///
/// Plain letters are the tool shortcuts; with Ctrl (or Cmd) only `S` is
/// bound so that system shortcuts keep working.
pub fn handle_key(key: Key, modifiers: Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(Named::ArrowRight) => Some(Message::Next),
        Key::Named(Named::ArrowLeft) => Some(Message::Previous),
        Key::Named(Named::Enter) => Some(Message::ApplyCrop),
        Key::Named(Named::Escape) => Some(Message::Escape),
        Key::Named(Named::Backspace) => Some(Message::ResetEdits),
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "s" => Some(Message::Save),
            _ if modifiers.command() => None,
            "f" => Some(Message::OpenFiles),
            "d" => Some(Message::OpenDirectory),
            "e" => Some(Message::RotateLeft),
            "r" => Some(Message::RotateRight),
            "c" => Some(Message::ToggleCrop),
            "g" => Some(Message::ToggleGallery),
            _ => None,
        },
        _ => None,
    }
}
