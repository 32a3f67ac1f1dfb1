//! Configuration module
//!
//! Contains the in-code ViewerConfig.

mod viewer_config;

pub use viewer_config::*;
