//! Grid composer: normalizes result images, arranges them into rows and
//! burns captions into the final composite.

pub mod color;
pub mod compose;
pub mod label;
pub mod raster;

use std::path::PathBuf;

pub use compose::{ComposeStyle, Entry, Footer, Group, HeadingMode, compose, compose_tiles};
pub use label::{TextStyle, Typeface, draw_label};
pub use raster::{
    Loaded, PlaceholderPolicy, Sizing, center_pad, concat_column, concat_row, load_or_placeholder,
    pad_to_width, resize_to_height, resize_uniform, solid,
};

/// Direction along which two rasters failed to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row concatenation, heights must agree.
    Height,
    /// Column concatenation, widths must agree.
    Width,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Height => f.write_str("height"),
            Axis::Width => f.write_str("width"),
        }
    }
}

/// Errors that can occur while building or writing a composite.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("could not load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{axis} mismatch at index {index}: expected {expected}, found {found}")]
    ShapeMismatch {
        axis: Axis,
        index: usize,
        expected: u32,
        found: u32,
    },
    #[error("nothing to concatenate ({what})")]
    Empty { what: &'static str },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid figure description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}
