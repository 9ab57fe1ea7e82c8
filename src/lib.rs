//! Moving golf-ball tracking with a fading motion trail.
//!
//! The crate consumes per-frame detection candidates, keeps a single
//! consistent moving target across frames, and renders a decaying trail
//! overlay onto each frame of a recorded swing video.

pub mod config;
pub mod error;
pub mod integration;
pub mod render;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use integration::{
    AnnotatedFrame, CandidateBuilder, CandidateSource, FramePipeline, RunOutput, RunStatus,
    resample,
};
pub use render::{Image, TrailDecay, TrailMarker, TrailRenderer};
pub use tracker::{
    BallTracker, Candidate, MotionFilter, PositionHistory, TrackPhase, TrackPoint, TrackState,
    TrackUpdate,
};
