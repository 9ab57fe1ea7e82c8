//! Stationary-object suppression.

use nalgebra::Point2;

use crate::config::TrackerConfig;
use crate::tracker::history::PositionHistory;
use crate::tracker::matching::Candidate;

/// Keeps only the candidates that have moved.
///
/// A candidate is discarded when it is below the confidence threshold, has
/// the wrong label, or lies within `motion_sensitivity` of
/// - any of the last `window` accepted track positions, or
/// - any confident observation from the neighbouring frames.
///
/// The second rule is what rejects a resting look-alike while no track
/// exists yet.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    confidence_threshold: f32,
    motion_sensitivity: f32,
    window: usize,
    label: String,
}

impl MotionFilter {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            motion_sensitivity: config.motion_sensitivity,
            window: config.motion_window,
            label: config.object_label.clone(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Label, confidence and position gate, applied regardless of motion.
    pub fn is_eligible(&self, candidate: &Candidate) -> bool {
        candidate.position.x.is_finite()
            && candidate.position.y.is_finite()
            && candidate.confidence >= self.confidence_threshold
            && (self.label.is_empty() || self.label.eq_ignore_ascii_case(&candidate.label))
    }

    /// Positions of the eligible candidates, used as neighbour observations
    /// for adjacent frames.
    pub fn observed_positions(&self, candidates: &[Candidate]) -> Vec<Point2<f32>> {
        candidates
            .iter()
            .filter(|c| self.is_eligible(c))
            .map(|c| c.position)
            .collect()
    }

    /// Whether `position` is within sensitivity of any reference point.
    pub fn is_stationary<'a>(
        &self,
        position: &Point2<f32>,
        references: impl IntoIterator<Item = &'a Point2<f32>>,
    ) -> bool {
        references
            .into_iter()
            .any(|r| nalgebra::distance(position, r) <= self.motion_sensitivity)
    }

    /// Subset of `candidates` classified as moving.
    pub fn filter(
        &self,
        candidates: &[Candidate],
        history: &PositionHistory,
        neighbours: &[Point2<f32>],
    ) -> Vec<Candidate> {
        candidates
            .iter()
            .filter(|c| self.is_eligible(c))
            .filter(|c| {
                !self.is_stationary(&c.position, history.recent(self.window).map(|p| &p.position))
            })
            .filter(|c| !self.is_stationary(&c.position, neighbours))
            .cloned()
            .collect()
    }
}
