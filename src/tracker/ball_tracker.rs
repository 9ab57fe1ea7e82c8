//! Single-ball track selection.

use std::collections::VecDeque;

use nalgebra::Point2;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::tracker::history::{PositionHistory, TrackPoint};
use crate::tracker::matching::{self, Candidate};
use crate::tracker::motion_filter::MotionFilter;
use crate::tracker::track_state::{TrackPhase, TrackState};

/// Outcome of one [`BallTracker::update`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackUpdate {
    pub frame_index: u64,
    /// Track state after this frame
    pub state: TrackState,
    /// Position accepted on this frame, if any
    pub accepted: Option<TrackPoint>,
    /// Number of candidates that survived the motion filter
    pub moving_candidates: usize,
}

impl TrackUpdate {
    pub fn phase(&self) -> TrackPhase {
        self.state.phase
    }
}

/// Tracks one moving ball across a frame sequence.
///
/// Each instance owns its state, so independent runs never share anything.
/// Frame indices are assigned internally, starting at 0 and increasing by
/// one per `update`.
pub struct BallTracker {
    config: TrackerConfig,
    filter: MotionFilter,
    state: TrackState,
    history: PositionHistory,
    observations: VecDeque<Vec<Point2<f32>>>,
    frame_id: u64,
}

impl BallTracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: MotionFilter::new(&config),
            state: TrackState::default(),
            history: PositionHistory::new(config.trail_length),
            observations: VecDeque::with_capacity(config.motion_window),
            frame_id: 0,
            config,
        })
    }

    /// Return to the freshly constructed state.
    pub fn reset(&mut self) {
        self.state = TrackState::default();
        self.history.clear();
        self.observations.clear();
        self.frame_id = 0;
    }

    /// Advance one frame without look-ahead.
    ///
    /// Only earlier frames are available to recognise resting objects, so an
    /// object first seen on this frame is treated as moving: a resting
    /// look-alike can anchor the track once before it is rejected on the next
    /// frame. Use [`update_with_next`](Self::update_with_next) when the
    /// following frame is known.
    pub fn update(&mut self, candidates: &[Candidate]) -> TrackUpdate {
        self.update_with_next(candidates, None)
    }

    /// Advance one frame that repeats the previous image, e.g. when
    /// upsampling. The frame index moves on; the track, history and motion
    /// observations stay exactly as they were.
    pub fn hold(&mut self) -> TrackUpdate {
        let frame_index = self.frame_id;
        self.frame_id += 1;
        TrackUpdate {
            frame_index,
            state: self.state,
            accepted: None,
            moving_candidates: 0,
        }
    }

    /// Advance one frame. `next` holds the candidates of the following frame
    /// when the caller has them; they are only used to recognise objects that
    /// are not moving.
    pub fn update_with_next(
        &mut self,
        candidates: &[Candidate],
        next: Option<&[Candidate]>,
    ) -> TrackUpdate {
        let frame_index = self.frame_id;
        self.frame_id += 1;

        let mut neighbours: Vec<Point2<f32>> =
            self.observations.iter().flatten().copied().collect();
        if let Some(next) = next {
            neighbours.extend(self.filter.observed_positions(next));
        }
        let moving = self.filter.filter(candidates, &self.history, &neighbours);

        self.observations
            .push_back(self.filter.observed_positions(candidates));
        while self.observations.len() > self.filter.window() {
            self.observations.pop_front();
        }

        let previous_phase = self.state.phase;
        let selected = match self.state.last_accepted_position {
            // Searching: anchor on the most confident moving candidate
            None => matching::most_confident(&moving),
            Some(origin) => {
                matching::nearest(&origin, &moving, self.displacement_gate(frame_index))
            }
        };

        let accepted = match selected {
            Some(idx) => {
                let point = TrackPoint {
                    frame_index,
                    position: moving[idx].position,
                };
                self.state.accept(frame_index, point.position);
                self.history.push(point);
                Some(point)
            }
            None => {
                if self.state.phase.is_active() && self.state.miss(self.config.miss_tolerance) {
                    self.history.clear();
                }
                None
            }
        };

        if previous_phase != self.state.phase {
            debug!(
                frame = frame_index,
                from = previous_phase.as_str(),
                to = self.state.phase.as_str(),
                "track phase changed"
            );
        }

        TrackUpdate {
            frame_index,
            state: self.state,
            accepted,
            moving_candidates: moving.len(),
        }
    }

    /// Largest distance from the last accepted position that still counts
    /// as the same ball on `frame_index`.
    fn displacement_gate(&self, frame_index: u64) -> f32 {
        let elapsed = self
            .state
            .last_accepted_frame_index
            .map_or(1, |last| frame_index.saturating_sub(last).max(1));
        self.config
            .max_displacement
            .max(self.config.motion_sensitivity)
            * elapsed as f32
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn phase(&self) -> TrackPhase {
        self.state.phase
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames processed since construction or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(x: f32, y: f32, confidence: f32) -> Candidate {
        Candidate::new(x, y, confidence, "ball")
    }

    fn tracker(config: TrackerConfig) -> BallTracker {
        BallTracker::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig {
            trail_length: 0,
            ..TrackerConfig::default()
        };
        assert!(BallTracker::new(config).is_err());
    }

    #[test]
    fn test_searching_picks_most_confident() {
        let mut t = tracker(TrackerConfig::default());
        let update = t.update(&[ball(10.0, 10.0, 0.92), ball(300.0, 40.0, 0.97)]);
        assert_eq!(update.phase(), TrackPhase::Tracking);
        assert_eq!(
            update.accepted.map(|p| p.position),
            Some(Point2::new(300.0, 40.0))
        );
    }

    #[test]
    fn test_nearest_neighbour_beats_confidence_once_tracking() {
        let mut t = tracker(TrackerConfig::default());
        t.update(&[ball(100.0, 100.0, 0.95)]);
        // A more confident object further away must not steal the track
        let update = t.update(&[ball(110.0, 95.0, 0.91), ball(180.0, 150.0, 0.99)]);
        assert_eq!(
            update.accepted.map(|p| p.position),
            Some(Point2::new(110.0, 95.0))
        );
    }

    #[test]
    fn test_displacement_gate_rejects_jumps() {
        let mut t = tracker(TrackerConfig {
            max_displacement: 50.0,
            ..TrackerConfig::default()
        });
        t.update(&[ball(100.0, 100.0, 0.95)]);
        let update = t.update(&[ball(400.0, 100.0, 0.99)]);
        assert_eq!(update.phase(), TrackPhase::Coasting);
        assert!(update.accepted.is_none());
        assert_eq!(t.history().len(), 1);
    }

    #[test]
    fn test_gate_grows_with_elapsed_frames() {
        let mut t = tracker(TrackerConfig {
            max_displacement: 50.0,
            ..TrackerConfig::default()
        });
        t.update(&[ball(100.0, 100.0, 0.95)]);
        t.update(&[]);
        // Two frames elapsed: 90 px is within 2 * 50 px
        let update = t.update(&[ball(190.0, 100.0, 0.95)]);
        assert_eq!(update.phase(), TrackPhase::Tracking);
        assert_eq!(t.state().consecutive_miss_count, 0);
    }

    #[test]
    fn test_miss_tolerance() {
        let mut t = tracker(TrackerConfig {
            miss_tolerance: 3,
            ..TrackerConfig::default()
        });
        t.update(&[ball(100.0, 100.0, 0.95)]);
        t.update(&[ball(110.0, 100.0, 0.95)]);
        for miss in 1..=3 {
            let update = t.update(&[]);
            assert_eq!(update.phase(), TrackPhase::Coasting);
            assert_eq!(update.state.consecutive_miss_count, miss);
            assert_eq!(t.history().len(), 2);
        }
        let update = t.update(&[]);
        assert_eq!(update.phase(), TrackPhase::Searching);
        assert!(t.history().is_empty());
        assert_eq!(t.state().last_accepted_position, None);
    }

    #[test]
    fn test_coasting_recovers() {
        let mut t = tracker(TrackerConfig::default());
        t.update(&[ball(100.0, 100.0, 0.95)]);
        t.update(&[]);
        let update = t.update(&[ball(130.0, 100.0, 0.95)]);
        assert_eq!(update.phase(), TrackPhase::Tracking);
        assert_eq!(update.state.last_accepted_frame_index, Some(2));
        assert_eq!(t.history().len(), 2);
    }

    #[test]
    fn test_history_bounded_by_trail_length() {
        let mut t = tracker(TrackerConfig {
            trail_length: 4,
            ..TrackerConfig::default()
        });
        for i in 0..12 {
            t.update(&[ball(10.0 * i as f32, 50.0, 0.95)]);
            assert!(t.history().len() <= 4);
        }
        assert_eq!(t.history().len(), 4);
    }

    #[test]
    fn test_lookahead_rejects_first_sighting_of_resting_object() {
        let mut t = tracker(TrackerConfig::default());
        let resting = [ball(50.0, 50.0, 0.99)];
        let update = t.update_with_next(&resting, Some(&resting));
        assert_eq!(update.phase(), TrackPhase::Searching);
        let update = t.update_with_next(&resting, None);
        assert_eq!(update.phase(), TrackPhase::Searching);
    }

    #[test]
    fn test_hold_keeps_track_unchanged() {
        let mut t = tracker(TrackerConfig {
            miss_tolerance: 1,
            ..TrackerConfig::default()
        });
        t.update(&[ball(100.0, 100.0, 0.95)]);
        let before = *t.state();
        for i in 1..=5 {
            let update = t.hold();
            assert_eq!(update.frame_index, i);
            assert_eq!(update.state, before);
            assert!(update.accepted.is_none());
        }
        assert_eq!(t.history().len(), 1);
        // The gate spans every held frame
        let update = t.update(&[ball(300.0, 100.0, 0.95)]);
        assert_eq!(update.phase(), TrackPhase::Tracking);
        assert_eq!(update.state.last_accepted_frame_index, Some(6));
    }

    #[test]
    fn test_reset() {
        let mut t = tracker(TrackerConfig::default());
        t.update(&[ball(100.0, 100.0, 0.95)]);
        t.reset();
        assert_eq!(t.frame_count(), 0);
        assert_eq!(*t.state(), TrackState::default());
        assert!(t.history().is_empty());
    }
}
