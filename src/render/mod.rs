//! Render module
//!
//! Placement math, status text and the sink the controller draws through.

mod layout;
mod sink;
mod text;
pub mod texture;

pub use layout::{Placement, Viewport};
pub use sink::{Notice, NoticeKind, RenderSink};
pub use text::StatusLine;
