//! Viewer state
//!
//! The three-state playback flow and the transient notice area.

use std::time::{Duration, Instant};

use crate::render::Notice;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// No video opened
    #[default]
    NoSession,
    /// Video opened, not playing
    Idle,
    /// Video opened, ticks scheduled
    Playing,
}

impl PlayState {
    /// Get display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayState::NoSession => "No Video",
            PlayState::Idle => "Paused",
            PlayState::Playing => "Playing",
        }
    }

    /// Label for the play/pause button
    pub fn toggle_label(&self) -> &'static str {
        match self {
            PlayState::Playing => "Pause",
            PlayState::NoSession | PlayState::Idle => "Play",
        }
    }
}

/// The most recent notice and when it expires
#[derive(Debug)]
pub struct NoticeBoard {
    current: Option<(Notice, Instant)>,
    duration: Duration,
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    /// Show `notice`, replacing whatever was there
    pub fn post(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now + self.duration));
    }

    /// The visible notice, clearing it once expired
    pub fn visible(&mut self, now: Instant) -> Option<&Notice> {
        if self.current.as_ref().is_some_and(|(_, expires)| *expires <= now) {
            self.current = None;
        }
        self.current.as_ref().map(|(notice, _)| notice)
    }

    /// When the visible notice goes away
    pub fn expires_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, expires)| *expires)
    }
}
