//! Destinations for rendered frames.
//!
//! Every grid rebuild that should be visible (one per tick, plus one per
//! drain step of the cautious strategy) is handed to a [`FrameSink`].
//! Presenting a frame never fails the simulation: write errors are logged
//! and the run continues.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::WorldError;
use crate::grid::GridSnapshot;
use crate::render::render_text;

/// Receives one snapshot per rendered frame.
pub trait FrameSink {
    /// Present a frame.
    fn present(&mut self, snapshot: &GridSnapshot);
}

/// Overwrites a text file with each rendered frame.
///
/// Watching the file (for example with `watch cat` or `inotifywait`) gives
/// a live view of the simulation.
#[derive(Debug)]
pub struct FileFrameSink {
    /// Destination file.
    path: PathBuf,
    /// Frames successfully written so far.
    frames_written: u64,
}

impl FileFrameSink {
    /// Create a sink writing to `path`, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Output`] if the parent directory cannot be
    /// created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, WorldError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| WorldError::Output {
                path: path.clone(),
                source,
            })?;
        }
        Ok(Self {
            path,
            frames_written: 0,
        })
    }

    /// Number of frames written successfully.
    pub const fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for FileFrameSink {
    fn present(&mut self, snapshot: &GridSnapshot) {
        let text = render_text(snapshot);
        match std::fs::write(&self.path, text) {
            Ok(()) => {
                self.frames_written = self.frames_written.saturating_add(1);
                debug!(path = %self.path.display(), frame = self.frames_written, "frame written");
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to write frame");
            }
        }
    }
}

/// Keeps every presented snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFrameSink {
    /// Presented frames, oldest first.
    frames: Vec<GridSnapshot>,
}

impl MemoryFrameSink {
    /// Create an empty sink.
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// All frames presented so far, oldest first.
    pub fn frames(&self) -> &[GridSnapshot] {
        &self.frames
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&GridSnapshot> {
        self.frames.last()
    }
}

impl FrameSink for MemoryFrameSink {
    fn present(&mut self, snapshot: &GridSnapshot) {
        self.frames.push(snapshot.clone());
    }
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFrameSink;

impl FrameSink for NullFrameSink {
    fn present(&mut self, _snapshot: &GridSnapshot) {}
}
