use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DdsViewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open texture file {path}: {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid DDS file: {0}")]
    InvalidDds(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode texture data: {0}")]
    Decode(String),

    #[error("Invalid texture dimensions: {width}x{height}x{depth}")]
    InvalidDimensions { width: u32, height: u32, depth: u32 },

    #[error("Subresource (item {item}, mip {mip}, slice {slice}) out of range")]
    SubresourceOutOfRange { item: usize, mip: usize, slice: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Render backend error: {0}")]
    Backend(String),
}

impl DdsViewError {
    /// True for errors caused by a format or layout the viewer cannot display.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }

    /// Prefix message-carrying variants with the file they concern.
    pub fn with_path(self, path: &Path) -> Self {
        let prefix = |msg: String| format!("{}: {msg}", path.display());
        match self {
            Self::InvalidDds(msg) => Self::InvalidDds(prefix(msg)),
            Self::UnsupportedFormat(msg) => Self::UnsupportedFormat(prefix(msg)),
            Self::Decode(msg) => Self::Decode(prefix(msg)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DdsViewError>;
