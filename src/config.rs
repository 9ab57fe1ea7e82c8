//! Run configuration for tracking and trail rendering.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::render::TrailDecay;

/// Configuration for one processing run.
///
/// Immutable for the duration of a run. Every field has a default, so a
/// partial document deserializes over [`TrackerConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Pixel distance at or below which a candidate counts as stationary.
    /// Lower values accept smaller movements.
    pub motion_sensitivity: f32,
    pub output_fps: f32,
    /// Candidates with confidence below this are dropped.
    pub confidence_threshold: f32,
    /// Maximum number of positions kept in the trail.
    pub trail_length: usize,
    /// Detector label to follow, compared case-insensitively. Empty accepts any label.
    pub object_label: String,
    /// Consecutive misses tolerated before the track is dropped.
    pub miss_tolerance: u32,
    /// Largest plausible ball displacement per elapsed frame, in pixels.
    pub max_displacement: f32,
    /// Number of recent frames/track points the motion filter looks back over.
    pub motion_window: usize,
    pub trail_decay: TrailDecay,
    pub marker_radius: f32,
    pub marker_color: [u8; 3],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            motion_sensitivity: 0.01,
            output_fps: 15.0,
            confidence_threshold: 0.9,
            trail_length: 25,
            object_label: "ball".to_string(),
            miss_tolerance: 3,
            max_displacement: 200.0,
            motion_window: 3,
            trail_decay: TrailDecay::default(),
            marker_radius: 4.0,
            marker_color: [255, 165, 0],
        }
    }
}

impl TrackerConfig {
    /// Check every field, reporting the first one out of range.
    pub fn validate(&self) -> Result<()> {
        if !self.motion_sensitivity.is_finite() || self.motion_sensitivity < 0.0 {
            return Err(TrackerError::invalid(
                "motion_sensitivity",
                format!("must be a non-negative number, got {}", self.motion_sensitivity),
            ));
        }
        if !self.output_fps.is_finite() || self.output_fps <= 0.0 {
            return Err(TrackerError::invalid(
                "output_fps",
                format!("must be positive, got {}", self.output_fps),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(TrackerError::invalid(
                "confidence_threshold",
                format!("must lie in [0, 1], got {}", self.confidence_threshold),
            ));
        }
        if self.trail_length == 0 {
            return Err(TrackerError::invalid("trail_length", "must be at least 1"));
        }
        if !self.max_displacement.is_finite() || self.max_displacement <= 0.0 {
            return Err(TrackerError::invalid(
                "max_displacement",
                format!("must be positive, got {}", self.max_displacement),
            ));
        }
        if self.motion_window == 0 {
            return Err(TrackerError::invalid("motion_window", "must be at least 1"));
        }
        if !self.marker_radius.is_finite() || self.marker_radius <= 0.0 {
            return Err(TrackerError::invalid(
                "marker_radius",
                format!("must be positive, got {}", self.marker_radius),
            ));
        }
        self.trail_decay.validate()
    }
}
