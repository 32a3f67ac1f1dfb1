//! Session state
//!
//! Everything bound to the one open video. The session owns the decoder, so
//! dropping it releases the video.

use std::path::{Path, PathBuf};

use super::schedule::TickHandle;
use crate::render::StatusLine;
use crate::video::FrameSource;

/// One opened video
pub struct Session<S: FrameSource> {
    /// Path the video was opened from
    pub(super) source_path: PathBuf,
    /// Decoder bound to the video
    pub(super) source: S,
    /// Total frames, always > 0
    pub(super) total_frames: usize,
    /// Authoritative frame index, in `0..total_frames`
    pub(super) current_index: usize,
    /// Where exported frames go
    pub(super) output_dir: PathBuf,
    /// Pending playback tick; `Some` while playing
    pub(super) pending_tick: Option<TickHandle>,
}

impl<S: FrameSource> Session<S> {
    pub(super) fn new(source_path: &Path, source: S, output_dir: PathBuf) -> Self {
        let total_frames = source.frame_count();
        Self {
            source_path: source_path.to_path_buf(),
            source,
            total_frames,
            current_index: 0,
            output_dir,
            pending_tick: None,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[cfg(test)]
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[cfg(test)]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_playing(&self) -> bool {
        self.pending_tick.is_some()
    }

    pub fn last_index(&self) -> usize {
        self.total_frames.saturating_sub(1)
    }

    /// Current index moved by `delta`, clamped to the video
    pub fn clamped_target(&self, delta: i64) -> usize {
        let target = (self.current_index as i64).saturating_add(delta);
        target.clamp(0, self.last_index() as i64) as usize
    }

    pub fn status_line(&self, filename_max_len: usize) -> StatusLine {
        StatusLine::loaded(
            &self.source_path,
            self.current_index,
            self.total_frames,
            filename_max_len,
        )
    }
}
