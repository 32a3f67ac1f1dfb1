//! Error types
//!
//! Every failure the viewer can hit is recovered locally and shown to the
//! user as a transient notice. These types carry the text for that notice.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A video could not be opened.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Video file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open video {}: {reason}", .path.display())]
    Unsupported { path: PathBuf, reason: String },

    #[error("No video stream found in {}", .0.display())]
    NoVideoStream(PathBuf),

    #[error("Video contains no frames: {}", .0.display())]
    Empty(PathBuf),
}

/// A frame could not be produced for an index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Frame {index} is out of range (video has {total} frames)")]
    OutOfRange { index: usize, total: usize },

    #[error("Frame {index} is not available: {reason}")]
    Unavailable { index: usize, reason: String },
}

/// Which end of the video navigation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    First,
    Last,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::First => f.write_str("Already at first frame"),
            Edge::Last => f.write_str("Already at last frame"),
        }
    }
}

/// Errors surfaced by the playback controller.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Not a real failure: navigation was a no-op at the first or last frame.
    #[error("{0}")]
    Boundary(Edge),

    #[error("No video loaded")]
    NoSession,

    #[error("Failed to save frame to {}: {reason}", .path.display())]
    Export { path: PathBuf, reason: String },
}

impl ViewerError {
    /// Boundary hits are reported through the notice channel like errors,
    /// but are expected during normal use.
    pub fn is_boundary(&self) -> bool {
        matches!(self, ViewerError::Boundary(_))
    }
}
