//! Video module
//!
//! Provides index-addressed frame decoding and frame export.
//!
//! # Usage
//!
//! ```rust,ignore
//! use video::{FfmpegBackend, FrameSource, VideoBackend};
//!
//! let mut source = FfmpegBackend.open(Path::new("clip.mp4"))?;
//! let frame = source.decode(source.frame_count() - 1)?;
//! ```

mod decoder;
mod export;
mod source;

pub use decoder::FfmpegBackend;
pub use export::{save_frame, OutputDirs};
pub use source::{check_index, Frame, FrameSource, VideoBackend};
