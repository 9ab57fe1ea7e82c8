//! Candidate type and single-target association utilities.

use nalgebra::Point2;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;

/// Detection candidate for one object instance in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Centre of the object in pixel space
    pub position: Point2<f32>,
    /// Detection confidence in `[0, 1]`
    pub confidence: f32,
    pub label: String,
}

impl Candidate {
    pub fn new(x: f32, y: f32, confidence: f32, label: impl Into<String>) -> Self {
        Self {
            position: Point2::new(x, y),
            confidence,
            label: label.into(),
        }
    }

    /// Candidate located at the centre of a pixel-space bounding box.
    pub fn from_rect(bbox: Rect, confidence: f32, label: impl Into<String>) -> Self {
        Self {
            position: bbox.center(),
            confidence,
            label: label.into(),
        }
    }
}

/// Euclidean distance from `origin` to every candidate.
pub fn distances(origin: &Point2<f32>, candidates: &[Candidate]) -> Array1<f32> {
    Array1::from_iter(
        candidates
            .iter()
            .map(|c| nalgebra::distance(origin, &c.position)),
    )
}

/// Index of the candidate nearest to `origin`, ties broken by higher
/// confidence. Returns `None` when the nearest one lies beyond `max_distance`.
pub fn nearest(origin: &Point2<f32>, candidates: &[Candidate], max_distance: f32) -> Option<usize> {
    let dists = distances(origin, candidates);
    let mut best: Option<usize> = None;
    for (i, &d) in dists.iter().enumerate() {
        best = match best {
            None => Some(i),
            Some(b) => {
                let closer = d < dists[b];
                let tie_but_surer =
                    d == dists[b] && candidates[i].confidence > candidates[b].confidence;
                if closer || tie_but_surer { Some(i) } else { Some(b) }
            }
        };
    }
    best.filter(|&b| dists[b] <= max_distance)
}

/// Index of the highest-confidence candidate, the earliest one on ties.
pub fn most_confident(candidates: &[Candidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        if best.is_none_or(|b| c.confidence > candidates[b].confidence) {
            best = Some(i);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_prefers_distance() {
        let origin = Point2::new(0.0, 0.0);
        let cands = vec![
            Candidate::new(30.0, 40.0, 0.99, "ball"),
            Candidate::new(3.0, 4.0, 0.91, "ball"),
        ];
        assert_eq!(distances(&origin, &cands).to_vec(), vec![50.0, 5.0]);
        assert_eq!(nearest(&origin, &cands, 100.0), Some(1));
    }

    #[test]
    fn test_nearest_tie_breaks_on_confidence() {
        let origin = Point2::new(0.0, 0.0);
        let cands = vec![
            Candidate::new(0.0, 10.0, 0.92, "ball"),
            Candidate::new(10.0, 0.0, 0.97, "ball"),
        ];
        assert_eq!(nearest(&origin, &cands, 100.0), Some(1));
    }

    #[test]
    fn test_nearest_respects_gate() {
        let origin = Point2::new(0.0, 0.0);
        let cands = vec![Candidate::new(300.0, 400.0, 0.99, "ball")];
        assert_eq!(nearest(&origin, &cands, 499.0), None);
        assert_eq!(nearest(&origin, &cands, 500.0), Some(0));
        assert_eq!(nearest(&origin, &[], 500.0), None);
    }

    #[test]
    fn test_most_confident() {
        let cands = vec![
            Candidate::new(0.0, 0.0, 0.91, "ball"),
            Candidate::new(1.0, 1.0, 0.97, "ball"),
            Candidate::new(2.0, 2.0, 0.97, "ball"),
        ];
        assert_eq!(most_confident(&cands), Some(1));
        assert_eq!(most_confident(&[]), None);
    }
}
