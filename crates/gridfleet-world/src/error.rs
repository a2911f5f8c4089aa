//! Error types for the `gridfleet-world` crate.

use std::path::PathBuf;

/// Errors that can occur while building the grid or preparing output.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid dimension was zero.
    #[error("invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The cell count does not fit in memory addressing.
    #[error("grid of {width}x{height} cells is too large")]
    GridTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The frame output location could not be prepared.
    #[error("failed to prepare frame output {}: {source}", .path.display())]
    Output {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
