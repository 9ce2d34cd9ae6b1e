#![forbid(unsafe_code)]

//! Sibling-image navigation.
//!
//! Opening an image remembers the other images in its directory so the
//! user can step through a dataset one file at a time. Listings are plain
//! file names sorted by name; only the extensions in [`IMAGE_EXTENSIONS`]
//! count, compared case-insensitively.

use std::io;
use std::path::{Path, PathBuf};

/// Extensions offered by the image open dialog.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`].
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// The images of one directory and a cursor into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFolder {
    dir: PathBuf,
    files: Vec<String>,
    index: Option<usize>,
}

impl ImageFolder {
    /// List the images in `dir`. The cursor starts unset.
    pub fn scan(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if !is_image_file(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(Self {
            dir,
            files,
            index: None,
        })
    }

    /// List the directory of `file` with the cursor on `file`.
    ///
    /// The cursor stays unset when `file` is not in the listing, for
    /// instance because its extension is not recognised.
    pub fn containing(file: &Path) -> io::Result<Self> {
        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut folder = Self::scan(dir)?;
        folder.index = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| folder.files.iter().position(|f| f == name));
        Ok(folder)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Cursor position, `None` when the current image is not in the listing.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub fn path_at(&self, index: usize) -> Option<PathBuf> {
        self.files.get(index).map(|name| self.dir.join(name))
    }

    #[must_use]
    pub fn current(&self) -> Option<PathBuf> {
        self.index.and_then(|i| self.path_at(i))
    }

    /// Whether a file follows the cursor.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.files.len())
    }

    /// Path of the file after the cursor, without moving it.
    #[must_use]
    pub fn peek_next(&self) -> Option<PathBuf> {
        self.index.filter(|_| self.has_next()).and_then(|i| self.path_at(i + 1))
    }

    /// Move the cursor to `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<PathBuf> {
        let path = self.path_at(index)?;
        self.index = Some(index);
        Some(path)
    }
}
