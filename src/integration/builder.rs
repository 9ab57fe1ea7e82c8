//! Builder for creating Candidate objects from raw detector output.

use crate::tracker::{Candidate, Rect};

/// Builder translating a detector's raw box into a pixel-space [`Candidate`]
/// located at the box centre.
#[derive(Debug, Clone, Default)]
pub struct CandidateBuilder {
    bbox: Rect,
    confidence: f32,
    label: String,
    frame_size: Option<(u32, u32)>,
}

impl CandidateBuilder {
    /// Create a new candidate builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    /// Set a point detection.
    pub fn point(self, x: f32, y: f32) -> Self {
        self.xywh(x, y, 0.0, 0.0)
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Coordinates are normalized to `[0, 1]` on a `width` x `height` frame.
    pub fn normalized(mut self, width: u32, height: u32) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    /// Build the final `Candidate`.
    pub fn build(self) -> Candidate {
        let bbox = match self.frame_size {
            Some((w, h)) => self.bbox.denormalize(w, h),
            None => self.bbox,
        };
        Candidate::from_rect(bbox, self.confidence, self.label)
    }
}
