//! Render sink
//!
//! The controller never touches widgets. Everything it wants shown goes
//! through this trait: the frame with its placement, the status line, and
//! short-lived notices.

use std::fmt;

use super::layout::Placement;
use super::text::StatusLine;
use crate::error::ViewerError;
use crate::video::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Boundary,
    Error,
}

/// A transient message for the notice area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }
}

impl From<&ViewerError> for Notice {
    fn from(err: &ViewerError) -> Self {
        let kind = if err.is_boundary() {
            NoticeKind::Boundary
        } else {
            NoticeKind::Error
        };
        Self {
            kind,
            text: err.to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Receiver for everything the controller displays
pub trait RenderSink {
    /// Show `frame` at `placement` inside the canvas
    fn present_frame(&mut self, frame: &Frame, placement: Placement);

    /// Remove the frame; the canvas falls back to the keymap
    fn clear_frame(&mut self);

    fn update_status(&mut self, status: &StatusLine);

    fn notify(&mut self, notice: Notice);
}
