use iced::widget::image::Handle;
use iced::widget::{canvas, column, container, stack, text, Image, Row};
use iced::{keyboard, Alignment, ContentFit, Element, Length, Subscription, Task, Theme};
use log::{debug, error, info, warn};
use rfd::FileDialog;
use std::path::PathBuf;

mod cli;
mod config;
mod error;
mod imaging;
mod state;
mod ui;

use config::{Config, ThemeChoice};
use error::Error;
use imaging::loader::LoadedImage;
use state::edit::CropRect;
use state::library::Library;
use state::session::Session;
use ui::canvas::CropOverlay;
use ui::gallery::Gallery;
use ui::status::Status;

/// Formats offered in the save dialog
const SAVE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

/// Everything the application needs at startup
struct Startup {
    config: Config,
    /// File or directory given on the command line
    path: Option<PathBuf>,
}

/// Main application state
struct ImageViewer {
    config: Config,
    /// Images being browsed
    library: Option<Library>,
    /// The open image and its unsaved edits
    session: Option<Session>,
    /// Crop selection in displayed-image pixels while the crop tool is open
    crop_selection: Option<CropRect>,
    gallery: Gallery,
    gallery_open: bool,
    /// An image or directory is being read in the background
    loading: bool,
    /// Incremented for every image load; results of older loads are dropped
    load_generation: u64,
    /// Status message to display to the user
    status: Status,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Open Image"
    OpenFiles,
    /// User clicked "Open Dir"
    OpenDirectory,
    /// Background directory scan finished
    LibraryReady(Result<Library, Error>),
    /// Background decode finished for the given load generation
    ImageLoaded(u64, Result<LoadedImage, Error>),
    Next,
    Previous,
    /// Jump to an image picked in the gallery
    Select(usize),
    RotateLeft,
    RotateRight,
    /// Show or hide the crop selection
    ToggleCrop,
    /// The crop selection was moved or resized
    CropChanged(CropRect),
    ApplyCrop,
    CancelCrop,
    ResetEdits,
    /// User asked to save the edited image
    Save,
    /// Background encode finished
    Saved(Result<PathBuf, Error>),
    ToggleGallery,
    ThumbnailLoaded(PathBuf, Result<Handle, Error>),
    /// Escape closes whatever is open (gallery, crop tool)
    Escape,
}

impl ImageViewer {
    /// Create a new instance of the application
    fn new(startup: Startup) -> (Self, Task<Message>) {
        let mut viewer = ImageViewer {
            config: startup.config,
            library: None,
            session: None,
            crop_selection: None,
            gallery: Gallery::default(),
            gallery_open: false,
            loading: false,
            load_generation: 0,
            status: Status::Idle,
        };

        let task = match startup.path {
            Some(path) => {
                viewer.loading = true;
                viewer.status = Status::Info(format!("Opening {}...", path.display()));
                Task::perform(
                    state::library::open_path_async(path, viewer.config.scan_options()),
                    Message::LibraryReady,
                )
            }
            None => Task::none(),
        };

        (viewer, task)
    }

    fn title(&self) -> String {
        match &self.session {
            Some(session) if session.is_edited() => {
                format!("{} * - Image Viewer", session.info().filename)
            }
            Some(session) => format!("{} - Image Viewer", session.info().filename),
            None => String::from("Image Viewer"),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFiles => {
                // Show the native file picker dialog
                let mut dialog = FileDialog::new()
                    .set_title("Select image")
                    .add_filter("Images", &self.config.extensions);
                if let Some(dir) = self.dialog_directory() {
                    dialog = dialog.set_directory(dir);
                }

                match dialog.pick_files() {
                    Some(paths) => self.open_library(Library::from_files(paths)),
                    None => Task::none(),
                }
            }
            Message::OpenDirectory => {
                let mut dialog = FileDialog::new().set_title("Select dir");
                if let Some(dir) = self.dialog_directory() {
                    dialog = dialog.set_directory(dir);
                }

                let Some(folder) = dialog.pick_folder() else {
                    return Task::none();
                };

                self.loading = true;
                self.status = Status::Info(format!("Scanning {}...", folder.display()));
                Task::perform(
                    state::library::scan_async(folder, self.config.scan_options()),
                    Message::LibraryReady,
                )
            }
            Message::LibraryReady(result) => {
                self.loading = false;
                self.open_library(result)
            }
            Message::ImageLoaded(generation, result) => {
                if generation != self.load_generation {
                    debug!("Dropping stale load result (generation {})", generation);
                    return Task::none();
                }
                self.loading = false;

                match result {
                    Ok(loaded) => {
                        self.status = match &self.session {
                            Some(old) if old.is_edited() && old.path() != loaded.info.path => {
                                Status::Info(format!(
                                    "Discarded unsaved edits to {}",
                                    old.info().filename
                                ))
                            }
                            _ => Status::Idle,
                        };
                        self.session = Some(Session::new(loaded));
                    }
                    Err(err) => {
                        self.session = None;
                        self.fail(err);
                    }
                }
                Task::none()
            }
            Message::Next => match self.library.as_mut() {
                Some(library) if library.len() > 1 => {
                    library.advance();
                    self.load_current()
                }
                _ => Task::none(),
            },
            Message::Previous => match self.library.as_mut() {
                Some(library) if library.len() > 1 => {
                    library.retreat();
                    self.load_current()
                }
                _ => Task::none(),
            },
            Message::Select(index) => {
                self.gallery_open = false;
                let Some(library) = self.library.as_mut() else {
                    return Task::none();
                };
                if index == library.current_index() && self.session.is_some() {
                    return Task::none();
                }
                if library.select(index).is_none() {
                    return Task::none();
                }
                self.load_current()
            }
            Message::RotateLeft => {
                if let Some(session) = self.session.as_mut() {
                    let dims = session.display_dimensions();
                    self.crop_selection = self
                        .crop_selection
                        .map(|rect| rect.rotate_counter_clockwise(dims));
                    session.rotate_left();
                }
                Task::none()
            }
            Message::RotateRight => {
                if let Some(session) = self.session.as_mut() {
                    let dims = session.display_dimensions();
                    self.crop_selection = self.crop_selection.map(|rect| rect.rotate_clockwise(dims));
                    session.rotate_right();
                }
                Task::none()
            }
            Message::ToggleCrop => {
                if let Some(session) = &self.session {
                    self.crop_selection = match self.crop_selection {
                        Some(_) => None,
                        None => Some(CropRect::centered(
                            self.config.default_crop_size,
                            session.display_dimensions(),
                        )),
                    };
                }
                Task::none()
            }
            Message::CropChanged(rect) => {
                // A drag can outlive a rotation, so fit the rect to the image as shown now
                if let (Some(session), Some(_)) = (&self.session, self.crop_selection) {
                    self.crop_selection = rect.clamp_to(session.display_dimensions());
                }
                Task::none()
            }
            Message::ApplyCrop => {
                if let (Some(session), Some(rect)) = (self.session.as_mut(), self.crop_selection) {
                    match session.crop(rect) {
                        Ok(()) => {
                            let (width, height) = session.display_dimensions();
                            self.crop_selection = None;
                            self.status = Status::Info(format!("Cropped to {}x{}", width, height));
                        }
                        Err(err) => self.fail(err),
                    }
                }
                Task::none()
            }
            Message::CancelCrop => {
                self.crop_selection = None;
                Task::none()
            }
            Message::ResetEdits => {
                if let Some(session) = self.session.as_mut() {
                    session.reset();
                    self.crop_selection = None;
                    self.status = Status::Idle;
                }
                Task::none()
            }
            Message::Save => {
                let Some(session) = &self.session else {
                    return Task::none();
                };

                let mut dialog = FileDialog::new()
                    .set_title("Save image")
                    .set_file_name(session.suggested_save_name())
                    .add_filter("Images", &SAVE_EXTENSIONS);
                if let Some(dir) = self.dialog_directory() {
                    dialog = dialog.set_directory(dir);
                }

                let Some(target) = dialog.save_file() else {
                    return Task::none();
                };

                self.status = Status::Info(format!("Saving {}...", target.display()));
                Task::perform(
                    imaging::saver::save_image(session.rendered(), target),
                    Message::Saved,
                )
            }
            Message::Saved(Ok(path)) => {
                info!("Saved {}", path.display());
                self.status = Status::Info(format!("Saved {}", path.display()));
                let options = self.config.scan_options();
                if let Some(library) = self.library.as_mut() {
                    library.insert(path, &options);
                }
                Task::none()
            }
            Message::Saved(Err(err)) => {
                self.fail(err);
                Task::none()
            }
            Message::ToggleGallery => {
                let Some(library) = &self.library else {
                    return Task::none();
                };

                self.gallery_open = !self.gallery_open;
                if !self.gallery_open {
                    return Task::none();
                }

                self.crop_selection = None;
                let missing = self.gallery.request_missing(library);
                debug!("Requesting {} thumbnails", missing.len());
                Task::batch(missing.into_iter().map(|path| {
                    Task::perform(
                        imaging::thumbnail::load_thumbnail(path.clone()),
                        move |result| Message::ThumbnailLoaded(path.clone(), result),
                    )
                }))
            }
            Message::ThumbnailLoaded(path, result) => {
                match result {
                    Ok(handle) => self.gallery.set_ready(path, handle),
                    Err(err) => {
                        warn!("Thumbnail failed: {}", err);
                        self.gallery.set_failed(path);
                    }
                }
                Task::none()
            }
            Message::Escape => {
                if self.gallery_open {
                    self.gallery_open = false;
                } else {
                    self.crop_selection = None;
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let menu = container(ui::toolbar::menu_row(self.session.is_some()))
            .center_x(Length::Fill)
            .padding(8);

        let main: Element<Message> = match (&self.library, self.gallery_open) {
            (Some(library), true) => self.gallery.view(library),
            _ => self.viewer(),
        };

        let mut content = column![menu, main].spacing(8).padding(8);

        if self.session.is_some() && !self.gallery_open {
            content = content.push(
                container(ui::toolbar::tools_row(
                    self.crop_selection.is_some(),
                    self.session.as_ref().is_some_and(Session::is_edited),
                    self.library.is_some(),
                ))
                .center_x(Length::Fill),
            );
        }

        content
            .push(ui::status::view(
                self.session.as_ref(),
                self.library.as_ref().map(Library::position),
                &self.status,
            ))
            .into()
    }

    /// The main row: navigation buttons around the image
    fn viewer(&self) -> Element<Message> {
        let center: Element<Message> = match &self.session {
            Some(session) => {
                let mut layers = stack![Image::new(session.handle().clone())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .content_fit(ContentFit::Contain)]
                .width(Length::Fill)
                .height(Length::Fill);

                if let Some(rect) = self.crop_selection {
                    layers = layers.push(
                        canvas(CropOverlay::new(session.display_dimensions(), rect))
                            .width(Length::Fill)
                            .height(Length::Fill),
                    );
                }
                layers.into()
            }
            None => {
                let label = if self.loading { "Loading..." } else { "No files selected" };
                container(text(label).size(24).style(|theme: &Theme| {
                    let mut color = theme.palette().text;
                    color.a = 0.5;
                    text::Style { color: Some(color) }
                }))
                .center(Length::Fill)
                .into()
            }
        };

        let navigable = self.library.as_ref().is_some_and(|library| library.len() > 1);
        let mut row = Row::new()
            .spacing(8)
            .align_y(Alignment::Center)
            .height(Length::Fill);

        if navigable {
            row = row.push(nav_button("<", Message::Previous));
        }
        row = row.push(center);
        if navigable {
            row = row.push(nav_button(">", Message::Next));
        }
        row.into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(ui::shortcuts::handle_key)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.config.theme {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }

    fn open_library(&mut self, result: Result<Library, Error>) -> Task<Message> {
        match result {
            Ok(library) => {
                let (_, count) = library.position();
                info!("Opened {} image(s)", count);
                self.library = Some(library);
                self.gallery.clear();
                self.gallery_open = false;
                self.load_current()
            }
            Err(err) => {
                self.fail(err);
                Task::none()
            }
        }
    }

    /// Decode the library's current image in the background
    fn load_current(&mut self) -> Task<Message> {
        let Some(library) = &self.library else {
            return Task::none();
        };

        let path = library.current().to_path_buf();
        self.crop_selection = None;
        self.loading = true;
        self.load_generation += 1;
        let generation = self.load_generation;

        Task::perform(imaging::loader::load_image(path), move |result| {
            Message::ImageLoaded(generation, result)
        })
    }

    /// Directory every file dialog starts in: the configured initial
    /// directory, else the open image's directory, else the scanned root
    fn dialog_directory(&self) -> Option<PathBuf> {
        self.config
            .initial_dir
            .clone()
            .or_else(|| {
                self.session
                    .as_ref()
                    .and_then(|session| session.path().parent().map(|p| p.to_path_buf()))
            })
            .or_else(|| self.library.as_ref().and_then(Library::root).map(|p| p.to_path_buf()))
    }

    fn fail(&mut self, err: Error) {
        error!("{}", err);
        self.status = Status::Error(err.to_string());
    }
}

fn nav_button(label: &str, message: Message) -> Element<'_, Message> {
    iced::widget::button(text(label).size(40))
        .padding([60, 12])
        .style(iced::widget::button::text)
        .on_press(message)
        .into()
}

fn main() -> iced::Result {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments and merge them into the config file
    let args = cli::parse_args();
    let mut config = Config::load_or_default(args.config_path().as_deref());
    args.apply_to(&mut config);

    if args.print_config {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot print config: {}", e),
        }
        return Ok(());
    }

    info!(
        "Starting Image Viewer (theme: {:?}, initial dir: {:?})",
        config.theme, config.initial_dir
    );

    let window_size = (config.window_width, config.window_height);
    let startup = Startup {
        config,
        path: args.path,
    };

    iced::application(ImageViewer::title, ImageViewer::update, ImageViewer::view)
        .theme(ImageViewer::theme)
        .subscription(ImageViewer::subscription)
        .window_size(window_size)
        .centered()
        .run_with(move || ImageViewer::new(startup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};
    use state::data::ImageInfo;
    use std::sync::Arc;

    fn viewer() -> ImageViewer {
        let (viewer, _) = ImageViewer::new(Startup {
            config: Config::default(),
            path: None,
        });
        viewer
    }

    fn loaded(name: &str, width: u32, height: u32) -> LoadedImage {
        LoadedImage {
            info: ImageInfo {
                filename: name.into(),
                path: PathBuf::from("/pictures").join(name),
                width,
                height,
                file_size: 0,
                modified: None,
                format: Some("Png".into()),
            },
            image: Arc::new(DynamicImage::ImageRgba8(RgbaImage::new(width, height))),
        }
    }

    /// Viewer browsing a.png and b.png with a.png open
    fn browsing() -> ImageViewer {
        let mut viewer = viewer();
        let files = vec![PathBuf::from("/pictures/a.png"), PathBuf::from("/pictures/b.png")];
        let _ = viewer.update(Message::LibraryReady(Library::from_files(files)));
        let generation = viewer.load_generation;
        let _ = viewer.update(Message::ImageLoaded(generation, Ok(loaded("a.png", 40, 100))));
        viewer
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut viewer = browsing();
        let stale = viewer.load_generation;
        let _ = viewer.update(Message::Next);

        let _ = viewer.update(Message::ImageLoaded(stale, Ok(loaded("late.png", 8, 8))));
        assert_eq!(viewer.session.as_ref().unwrap().info().filename, "a.png");
        assert!(viewer.loading);

        let current = viewer.load_generation;
        let _ = viewer.update(Message::ImageLoaded(current, Ok(loaded("b.png", 8, 8))));
        assert_eq!(viewer.session.as_ref().unwrap().info().filename, "b.png");
        assert!(!viewer.loading);
    }

    #[test]
    fn test_navigating_away_discards_edits() {
        let mut viewer = browsing();
        let _ = viewer.update(Message::RotateRight);
        assert!(viewer.session.as_ref().unwrap().is_edited());

        let _ = viewer.update(Message::Next);
        let generation = viewer.load_generation;
        let _ = viewer.update(Message::ImageLoaded(generation, Ok(loaded("b.png", 8, 8))));

        let session = viewer.session.as_ref().unwrap();
        assert!(!session.is_edited());
        assert_eq!(
            viewer.status,
            Status::Info("Discarded unsaved edits to a.png".into())
        );
    }

    #[test]
    fn test_failed_load_clears_image() {
        let mut viewer = browsing();
        let _ = viewer.update(Message::Next);
        let generation = viewer.load_generation;
        let err = Error::Decode {
            path: PathBuf::from("/pictures/b.png"),
            message: "bad data".into(),
        };
        let _ = viewer.update(Message::ImageLoaded(generation, Err(err)));

        assert!(viewer.session.is_none());
        assert!(matches!(viewer.status, Status::Error(_)));
    }

    #[test]
    fn test_rotating_maps_open_selection() {
        let mut viewer = browsing();
        let _ = viewer.update(Message::ToggleCrop);
        assert_eq!(viewer.crop_selection, Some(CropRect::new(0, 30, 40, 40)));

        let _ = viewer.update(Message::CropChanged(CropRect::new(0, 0, 40, 10)));
        let _ = viewer.update(Message::RotateRight);

        assert_eq!(viewer.session.as_ref().unwrap().display_dimensions(), (100, 40));
        assert_eq!(viewer.crop_selection, Some(CropRect::new(90, 0, 10, 40)));
    }

    #[test]
    fn test_selection_from_before_rotation_is_fitted() {
        let mut viewer = browsing();
        let _ = viewer.update(Message::ToggleCrop);
        let _ = viewer.update(Message::RotateLeft);

        // A drag that started on the upright image reports a rect taller than the turned one
        let _ = viewer.update(Message::CropChanged(CropRect::new(0, 5, 40, 60)));
        assert_eq!(viewer.crop_selection, Some(CropRect::new(0, 5, 40, 35)));

        let _ = viewer.update(Message::RotateLeft);
        let _ = viewer.update(Message::CropChanged(CropRect::new(90, 0, 10, 10)));
        assert_eq!(viewer.crop_selection, None);
    }

    #[test]
    fn test_apply_crop_clears_selection() {
        let mut viewer = browsing();
        let _ = viewer.update(Message::ToggleCrop);
        let _ = viewer.update(Message::CropChanged(CropRect::new(5, 10, 20, 30)));
        let _ = viewer.update(Message::ApplyCrop);

        assert_eq!(viewer.crop_selection, None);
        assert_eq!(viewer.session.as_ref().unwrap().display_dimensions(), (20, 30));
        assert_eq!(viewer.status, Status::Info("Cropped to 20x30".into()));
        assert_eq!(viewer.title(), "a.png * - Image Viewer");
    }

    #[test]
    fn test_crop_changes_ignored_when_tool_closed() {
        let mut viewer = browsing();
        let _ = viewer.update(Message::CropChanged(CropRect::new(0, 0, 5, 5)));
        assert_eq!(viewer.crop_selection, None);
    }

    #[test]
    fn test_dialogs_start_in_initial_dir() {
        let mut viewer = browsing();
        assert_eq!(viewer.dialog_directory(), Some(PathBuf::from("/pictures")));

        viewer.config.initial_dir = Some(PathBuf::from("/home/me/photos"));
        assert_eq!(viewer.dialog_directory(), Some(PathBuf::from("/home/me/photos")));
    }
}
