//! Frame source abstraction
//!
//! The playback controller only ever sees these traits. A `VideoBackend`
//! opens a path into a `FrameSource`; the source maps a frame index to a
//! freshly decoded `Frame`. Dropping the source releases its decoder.

use std::path::Path;

use image::RgbImage;

use crate::error::{DecodeError, OpenError};

/// A decoded frame, owned by whoever asked for it
#[derive(Debug, Clone)]
pub struct Frame {
    /// Index this frame was decoded for
    pub index: usize,
    /// RGB pixels at the video's native size
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self { index, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Index → pixels for one opened video
pub trait FrameSource {
    /// Total number of frames in the video
    fn frame_count(&self) -> usize;

    /// Decode the frame at `index`
    ///
    /// Fails with [`DecodeError::OutOfRange`] for indices past the end and
    /// [`DecodeError::Unavailable`] when the stream cannot produce the frame.
    fn decode(&mut self, index: usize) -> Result<Frame, DecodeError>;
}

/// Opens video files into frame sources
pub trait VideoBackend {
    type Source: FrameSource;

    fn open(&mut self, path: &Path) -> Result<Self::Source, OpenError>;
}

/// Range check shared by every source implementation
pub fn check_index(index: usize, total: usize) -> Result<(), DecodeError> {
    if index >= total {
        return Err(DecodeError::OutOfRange { index, total });
    }
    Ok(())
}
