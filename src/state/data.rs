//! Shared data structures for the application state
//!
//! These structs represent the data that flows between
//! the imaging layer and the UI layer.

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Represents a single image file opened in the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Filename only (e.g., "DSC_0001.jpg")
    pub filename: String,
    /// Full path to the file
    pub path: PathBuf,
    /// Width of the decoded image in pixels
    pub width: u32,
    /// Height of the decoded image in pixels
    pub height: u32,
    /// Size of the file on disk in bytes
    pub file_size: u64,
    /// Last modification time, if the filesystem reports one
    pub modified: Option<DateTime<Local>>,
    /// Format detected from the file contents (e.g., "Png")
    pub format: Option<String>,
}

impl ImageInfo {
    /// Human readable file size ("512 B", "1.4 KB", "3.2 MB")
    pub fn size_label(&self) -> String {
        human_size(self.file_size)
    }

    pub fn modified_label(&self) -> Option<String> {
        self.modified
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
    }
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_modified_label_is_optional() {
        let info = ImageInfo {
            filename: "a.png".into(),
            path: PathBuf::from("/tmp/a.png"),
            width: 1,
            height: 1,
            file_size: 10,
            modified: None,
            format: None,
        };
        assert_eq!(info.modified_label(), None);
        assert_eq!(info.size_label(), "10 B");
    }
}
