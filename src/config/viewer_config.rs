//! ViewerConfig data structure
//!
//! Timing, layout and export constants for the viewer. Nothing here is read
//! from disk; the defaults are the configuration.

use std::path::PathBuf;
use std::time::Duration;

use image::ImageFormat;

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Delay between playback ticks
    pub play_interval: Duration,
    /// Frames moved by skip-back / skip-forward
    pub skip_step: usize,
    /// How long a transient notice stays visible
    pub notice_duration: Duration,
    /// Filenames longer than this are shortened in the status line
    pub filename_max_len: usize,
    /// Initial canvas size in points (width, height)
    pub canvas_size: (u32, u32),
    /// Height of the control strip below the canvas
    pub controls_height: f32,
    /// Directory under which per-video output directories are created
    pub output_root: PathBuf,
    /// Image format for exported frames
    pub export_format: ImageFormat,
    /// Extensions offered by the open dialog
    pub video_extensions: Vec<&'static str>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            play_interval: Duration::from_millis(100),
            skip_step: 10,
            notice_duration: Duration::from_secs(3),
            filename_max_len: 40,
            canvas_size: (1000, 700),
            controls_height: 120.0,
            output_root: PathBuf::from("."),
            export_format: ImageFormat::Png,
            video_extensions: vec!["mp4", "mov", "avi", "mkv"],
        }
    }
}

impl ViewerConfig {
    /// Initial window size: canvas plus the control strip
    pub fn window_size(&self) -> [f32; 2] {
        [
            self.canvas_size.0 as f32,
            self.canvas_size.1 as f32 + self.controls_height,
        ]
    }

    /// Skip step as a signed frame delta
    pub fn skip_delta(&self) -> i64 {
        self.skip_step as i64
    }
}
