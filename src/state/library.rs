use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// Extensions opened by default (lowercase, no dot)
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Controls which files a directory scan picks up
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Lowercase extensions without the leading dot
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            recursive: false,
        }
    }
}

impl ScanOptions {
    /// Check if `path` has one of the accepted extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }
}

/// The Library is the ordered list of images being browsed.
/// It always holds at least one entry, and `current` always points into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    /// Directory the entries were scanned from (None for a picked file list)
    root: Option<PathBuf>,
    entries: Vec<PathBuf>,
    current: usize,
}

impl Library {
    /// Build a library from an explicit list of files, keeping their order
    pub fn from_files(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::NoImages(PathBuf::new()));
        }

        Ok(Library {
            root: None,
            entries: paths,
            current: 0,
        })
    }

    /// Scan `dir` for images and select the first one.
    ///
    /// Hidden files and directories are skipped. Entries are sorted by
    /// file name, ignoring case.
    pub fn scan(dir: &Path, options: &ScanOptions) -> Result<Self> {
        let max_depth = if options.recursive { usize::MAX } else { 1 };
        let mut entries = Vec::new();

        debug!("Scanning folder: {}", dir.display());

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                // The directory itself is unreadable; nothing to browse
                Err(err) if err.depth() == 0 => return Err(Error::io(dir, err)),
                Err(err) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                    continue;
                }
            };

            if entry.file_type().is_file() && options.accepts(entry.path()) {
                entries.push(entry.into_path());
            }
        }

        if entries.is_empty() {
            return Err(Error::NoImages(dir.to_path_buf()));
        }

        entries.sort_by_key(|path| sort_key(path));

        info!("Found {} images in {}", entries.len(), dir.display());

        Ok(Library {
            root: Some(dir.to_path_buf()),
            entries,
            current: 0,
        })
    }

    /// Scan the parent directory of `file` and select `file` in it.
    ///
    /// If the file is not part of the scan (hidden, unlisted extension) the
    /// library holds only that file.
    pub fn containing(file: &Path, options: &ScanOptions) -> Result<Self> {
        let parent = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let scanned = match Library::scan(&parent, &ScanOptions { recursive: false, ..options.clone() }) {
            Ok(library) => Some(library),
            Err(Error::NoImages(_)) => None,
            Err(err) => return Err(err),
        };

        if let Some(mut library) = scanned {
            if let Some(index) = library.entries.iter().position(|p| same_file(p, file)) {
                library.current = index;
                return Ok(library);
            }
        }

        Library::from_files(vec![file.to_path_buf()])
    }

    /// Path of the selected image
    pub fn current(&self) -> &Path {
        &self.entries[self.current]
    }

    /// Move to the next image, wrapping around to the first
    pub fn advance(&mut self) -> &Path {
        self.current = (self.current + 1) % self.entries.len();
        self.current()
    }

    /// Move to the previous image, wrapping around to the last
    pub fn retreat(&mut self) -> &Path {
        self.current = (self.current + self.entries.len() - 1) % self.entries.len();
        self.current()
    }

    /// Select the image at `index`. Out of range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<&Path> {
        if index >= self.entries.len() {
            return None;
        }
        self.current = index;
        Some(self.current())
    }

    /// Add a file (e.g. a freshly saved copy) to a scanned library.
    ///
    /// Only files a rescan with `options` would pick up directly in the
    /// scanned directory are added. The selection keeps pointing at the same image.
    pub fn insert(&mut self, path: PathBuf, options: &ScanOptions) -> bool {
        let belongs = match &self.root {
            Some(root) => {
                options.accepts(&path) && path.parent().is_some_and(|parent| same_file(parent, root))
            }
            None => false,
        };
        if !belongs || self.entries.contains(&path) {
            return false;
        }

        let selected = self.entries[self.current].clone();
        self.entries.push(path);
        self.entries.sort_by_key(|path| sort_key(path));
        self.current = self
            .entries
            .iter()
            .position(|p| *p == selected)
            .unwrap_or(0);
        true
    }

    /// Zero-based index of the selection and the number of entries
    pub fn position(&self) -> (usize, usize) {
        (self.current, self.entries.len())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

/// Scan a directory on the blocking pool
pub async fn scan_async(dir: PathBuf, options: ScanOptions) -> Result<Library> {
    task::spawn_blocking(move || Library::scan(&dir, &options)).await?
}

/// Open a path given on the command line: a directory is scanned, a file is
/// opened together with its siblings
pub async fn open_path_async(path: PathBuf, options: ScanOptions) -> Result<Library> {
    task::spawn_blocking(move || {
        let metadata = std::fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        if metadata.is_dir() {
            Library::scan(&path, &options)
        } else {
            Library::containing(&path, &options)
        }
    })
    .await?
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase()
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
