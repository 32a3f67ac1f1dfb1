//! Frame placement
//!
//! Fits a frame into the canvas: largest centered rectangle with the
//! frame's aspect ratio.

/// Canvas size in points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where a frame is drawn inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Compute the placement of a `frame_width` x `frame_height` frame
    pub fn fit(frame_width: u32, frame_height: u32, viewport: Viewport) -> Self {
        if frame_width == 0 || frame_height == 0 || viewport.is_empty() {
            return Self::default();
        }

        let aspect = frame_width as f64 / frame_height as f64;
        let viewport_aspect = viewport.width as f64 / viewport.height as f64;

        let (width, height) = if viewport_aspect > aspect {
            // Fit to height
            let width = (viewport.height as f64 * aspect) as u32;
            (width, viewport.height)
        } else {
            // Fit to width
            let height = (viewport.width as f64 / aspect) as u32;
            (viewport.width, height)
        };

        Self {
            x: (viewport.width - width) / 2,
            y: (viewport.height - height) / 2,
            width,
            height,
        }
    }
}
