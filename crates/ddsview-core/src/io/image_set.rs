use std::path::{Path, PathBuf};

use crate::config::FilesConfig;
use crate::error::{DdsViewError, Result};

/// The files of one directory that directory navigation walks through, plus
/// a cursor that never leaves `[0, len-1]`.
#[derive(Clone, Debug, Default)]
pub struct ImageSet {
    files: Vec<PathBuf>,
    index: usize,
}

impl ImageSet {
    /// List the directory holding `current_file`, keeping files whose
    /// extension matches `filter`, sorted by path. The cursor starts on
    /// `current_file`, which is always part of the set.
    pub fn scan(current_file: &Path, filter: &FilesConfig) -> Result<Self> {
        let dir = match current_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = std::fs::read_dir(&dir).map_err(|source| DdsViewError::FileNotFound {
            path: dir.clone(),
            source,
        })?;

        let current_name = current_file.file_name();
        let mut files = Vec::new();
        let mut saw_current = false;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_current = current_name.is_some() && path.file_name() == current_name;
            if is_current || filter.matches(&path) {
                saw_current |= is_current;
                files.push(path);
            }
        }
        if !saw_current {
            files.push(dir.join(current_name.unwrap_or_default()));
        }
        files.sort();

        let index = files
            .iter()
            .position(|p| p.file_name() == current_name)
            .unwrap_or(0);

        tracing::debug!(
            "Scanned {}: {} matching files, current index {}",
            dir.display(),
            files.len(),
            index
        );

        Ok(Self { files, index })
    }

    /// Build a set from an explicit list; `index` is clamped into range.
    pub fn from_paths(files: Vec<PathBuf>, index: usize) -> Self {
        let index = index.min(files.len().saturating_sub(1));
        Self { files, index }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn current(&self) -> Option<&Path> {
        self.files.get(self.index).map(PathBuf::as_path)
    }

    /// Index reached by moving `delta` files from the cursor, clamped.
    pub fn clamped_target(&self, delta: isize) -> usize {
        if self.files.is_empty() {
            return 0;
        }
        let last = self.files.len() - 1;
        self.index.saturating_add_signed(delta).min(last)
    }

    /// Move the cursor by `delta`. Returns the new current file, or `None`
    /// when clamping left the cursor where it was.
    pub fn step(&mut self, delta: isize) -> Option<&Path> {
        let target = self.clamped_target(delta);
        if target == self.index || self.files.is_empty() {
            return None;
        }
        self.index = target;
        self.current()
    }
}
