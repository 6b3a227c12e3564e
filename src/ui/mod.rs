//! User interface building blocks
//!
//! - Crop selection overlay drawn on a canvas (canvas.rs)
//! - Thumbnail grid of the browsed images (gallery.rs)
//! - Keyboard shortcuts (shortcuts.rs)
//! - Status bar (status.rs)
//! - Menu and tool rows (toolbar.rs)

pub mod canvas;
pub mod gallery;
pub mod shortcuts;
pub mod status;
pub mod toolbar;
