//! Labeled comparison grids for image retrieval results.

pub mod figure;
pub mod grid;
#[cfg(feature = "preview")]
pub mod preview;
