use iced::widget::{button, row, text, Row};
use iced::{Alignment, Element};

use crate::Message;

/// Top row: open and save actions
pub fn menu_row<'a>(can_save: bool) -> Element<'a, Message> {
    row![
        menu_button("Open Image", Some(Message::OpenFiles)),
        menu_button("Open Dir", Some(Message::OpenDirectory)),
        menu_button("Save Image", can_save.then_some(Message::Save)),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

/// Bottom row: editing tools for the open image
pub fn tools_row<'a>(cropping: bool, edited: bool, has_library: bool) -> Element<'a, Message> {
    let mut tools = Row::new()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(tool_button("Rotate Left", Some(Message::RotateLeft)));

    tools = if cropping {
        tools
            .push(tool_button("Apply Crop", Some(Message::ApplyCrop)))
            .push(tool_button("Cancel", Some(Message::CancelCrop)))
    } else {
        tools.push(tool_button("Crop", Some(Message::ToggleCrop)))
    };

    tools
        .push(tool_button("Rotate Right", Some(Message::RotateRight)))
        .push(tool_button("Reset", edited.then_some(Message::ResetEdits)))
        .push(tool_button("Gallery", has_library.then_some(Message::ToggleGallery)))
        .into()
}

fn menu_button<'a>(label: &'a str, message: Option<Message>) -> Element<'a, Message> {
    button(text(label).size(18))
        .padding([8, 16])
        .on_press_maybe(message)
        .into()
}

fn tool_button<'a>(label: &'a str, message: Option<Message>) -> Element<'a, Message> {
    button(text(label).size(14))
        .padding([6, 12])
        .style(button::secondary)
        .on_press_maybe(message)
        .into()
}
