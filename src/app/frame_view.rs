//! egui side of the render sink
//!
//! Collects what the controller wants displayed; the app uploads it to a
//! texture and the notice board on its next pass.

use egui::{Color32, ColorImage};

use crate::render::texture::to_color_image;
use crate::render::{Notice, Placement, RenderSink, StatusLine};
use crate::video::Frame;

#[derive(Default)]
pub struct FrameView {
    /// Frame waiting for texture upload
    pending_image: Option<ColorImage>,
    /// Placement of the displayed frame; `None` shows the keymap
    placement: Option<Placement>,
    status: String,
    pending_notices: Vec<Notice>,
    /// Reusable color buffer to avoid allocations every frame
    color_buffer: Vec<Color32>,
}

impl FrameView {
    pub fn take_image(&mut self) -> Option<ColorImage> {
        self.pending_image.take()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending_notices)
    }
}

impl RenderSink for FrameView {
    fn present_frame(&mut self, frame: &Frame, placement: Placement) {
        self.pending_image = Some(to_color_image(&mut self.color_buffer, &frame.image));
        self.placement = Some(placement);
    }

    fn clear_frame(&mut self) {
        self.pending_image = None;
        self.placement = None;
    }

    fn update_status(&mut self, status: &StatusLine) {
        self.status = status.to_string();
    }

    fn notify(&mut self, notice: Notice) {
        self.pending_notices.push(notice);
    }
}
