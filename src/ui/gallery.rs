use iced::widget::image::Handle;
use iced::widget::{button, column, container, scrollable, text, Image};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::imaging::thumbnail::THUMBNAIL_SIZE;
use crate::state::library::Library;
use crate::Message;

/// Width of a gallery tile (thumbnail plus padding)
const TILE_WIDTH: f32 = THUMBNAIL_SIZE as f32 + 16.0;

#[derive(Debug, Clone)]
enum Thumbnail {
    Loading,
    Ready(Handle),
    Failed,
}

/// Grid of thumbnails for every image in the library.
///
/// Thumbnails are generated on demand the first time the gallery opens and
/// are kept in memory until a different library is opened.
#[derive(Debug, Default)]
pub struct Gallery {
    thumbnails: HashMap<PathBuf, Thumbnail>,
}

impl Gallery {
    /// Paths that still need a thumbnail. They are marked as loading, so a
    /// second call does not request them again.
    pub fn request_missing(&mut self, library: &Library) -> Vec<PathBuf> {
        let missing: Vec<PathBuf> = library
            .entries()
            .iter()
            .filter(|path| !self.thumbnails.contains_key(*path))
            .cloned()
            .collect();

        for path in &missing {
            self.thumbnails.insert(path.clone(), Thumbnail::Loading);
        }
        missing
    }

    pub fn set_ready(&mut self, path: PathBuf, handle: Handle) {
        self.thumbnails.insert(path, Thumbnail::Ready(handle));
    }

    pub fn set_failed(&mut self, path: PathBuf) {
        self.thumbnails.insert(path, Thumbnail::Failed);
    }

    /// Forget all thumbnails (a new library was opened)
    pub fn clear(&mut self) {
        self.thumbnails.clear();
    }

    pub fn view<'a>(&'a self, library: &'a Library) -> Element<'a, Message> {
        let current = library.current_index();
        let tiles: Vec<Element<'a, Message>> = library
            .entries()
            .iter()
            .enumerate()
            .map(|(index, path)| self.tile(index, path, index == current))
            .collect();

        scrollable(
            container(Wrap::with_elements(tiles).spacing(12.0).line_spacing(12.0))
                .padding(16)
                .width(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn tile<'a>(&'a self, index: usize, path: &'a Path, selected: bool) -> Element<'a, Message> {
        let preview: Element<'a, Message> = match self.thumbnails.get(path) {
            Some(Thumbnail::Ready(handle)) => Image::new(handle.clone())
                .width(Length::Fixed(THUMBNAIL_SIZE as f32))
                .height(Length::Fixed(THUMBNAIL_SIZE as f32))
                .content_fit(ContentFit::Contain)
                .into(),
            Some(Thumbnail::Failed) => placeholder("Unreadable"),
            Some(Thumbnail::Loading) | None => placeholder("Loading..."),
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        button(
            column![preview, text(name).size(12)]
                .spacing(4)
                .align_x(Alignment::Center),
        )
        .width(Length::Fixed(TILE_WIDTH))
        .padding(8)
        .style(if selected { button::primary } else { button::text })
        .on_press(Message::Select(index))
        .into()
    }
}

fn placeholder<'a>(label: &'a str) -> Element<'a, Message> {
    container(text(label).size(12))
        .width(Length::Fixed(THUMBNAIL_SIZE as f32))
        .height(Length::Fixed(THUMBNAIL_SIZE as f32))
        .center_x(Length::Fixed(THUMBNAIL_SIZE as f32))
        .center_y(Length::Fixed(THUMBNAIL_SIZE as f32))
        .into()
}
