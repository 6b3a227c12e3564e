use iced::widget::{row, text, Space};
use iced::{Element, Length};

use crate::state::session::Session;
use crate::Message;

/// Latest message shown to the user
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Status {
    #[default]
    Idle,
    Info(String),
    Error(String),
}

/// Bottom bar: details about the open image and the latest status message
pub fn view<'a>(
    session: Option<&'a Session>,
    position: Option<(usize, usize)>,
    status: &'a Status,
) -> Element<'a, Message> {
    let details = session
        .map(|session| describe(session, position))
        .unwrap_or_default();

    let message = match status {
        Status::Idle => text(""),
        Status::Info(message) => text(message.as_str()),
        Status::Error(message) => text(message.as_str()).style(text::danger),
    };

    row![
        text(details).size(13),
        Space::with_width(Length::Fill),
        message.size(13),
    ]
    .spacing(12)
    .into()
}

/// "photo.jpg | 3/12 | 1920x1080 | Jpeg | 2.3 MB | 2026-05-01 14:02 | edited"
pub fn describe(session: &Session, position: Option<(usize, usize)>) -> String {
    let info = session.info();
    let (width, height) = session.display_dimensions();

    let mut parts = vec![info.filename.clone()];
    if let Some((index, total)) = position {
        parts.push(format!("{}/{}", index + 1, total));
    }
    if session.is_edited() && (width, height) != (info.width, info.height) {
        parts.push(format!("{}x{} (original {}x{})", width, height, info.width, info.height));
    } else {
        parts.push(format!("{}x{}", width, height));
    }
    if let Some(format) = &info.format {
        parts.push(format.clone());
    }
    parts.push(info.size_label());
    if let Some(modified) = info.modified_label() {
        parts.push(modified);
    }
    if session.is_edited() {
        parts.push("edited".to_string());
    }
    parts.join(" | ")
}
