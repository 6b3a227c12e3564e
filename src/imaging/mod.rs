//! Image decoding and encoding module
//!
//! Everything here is a thin layer over the `image` crate:
//! - Decoding files and reading their metadata (loader.rs)
//! - Applying rotation and crop (transform.rs)
//! - Converting to iced image handles for display (preview.rs)
//! - Encoding edited images back to disk (saver.rs)
//! - Generating in-memory thumbnails for the gallery (thumbnail.rs)

pub mod loader;
pub mod preview;
pub mod saver;
pub mod thumbnail;
pub mod transform;
