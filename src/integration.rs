//! Integration module for connecting detection backends with the ball tracker.
//!
//! This module provides the candidate-source boundary, the adapter from raw
//! detector boxes to [`Candidate`](crate::tracker::Candidate)s, frame-rate
//! resampling, and the end-to-end frame pipeline.

mod builder;
mod detector;
mod pipeline;
mod resampling;

pub use builder::CandidateBuilder;
pub use detector::{CandidateSource, IntoCandidates, RecordedCandidates};
pub use pipeline::{AnnotatedFrame, FramePipeline, RunOutput, RunStatus};
pub use resampling::resample;

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
