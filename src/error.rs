//! Error type shared by the tracker, renderer and pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// A configuration value is out of range. Raised before any frame is processed.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// The candidate source failed for one frame. Absorbed by the pipeline.
    #[error("detection unavailable for source frame {frame}: {message}")]
    DetectionUnavailable { frame: usize, message: String },
}

impl TrackerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
