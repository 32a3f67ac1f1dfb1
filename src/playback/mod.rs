//! Playback module
//!
//! Frame navigation and the playback tick loop.

mod controller;
mod schedule;
mod session;

pub use controller::{Clock, PlaybackController};
pub use schedule::{TickHandle, TickScheduler};
pub use session::Session;
