//! Application module
//!
//! Contains the egui application, command dispatch and viewer state.

pub mod command;
mod frame_view;
pub mod state;
mod viewer_app;

pub use frame_view::FrameView;
pub use viewer_app::ViewerApp;
