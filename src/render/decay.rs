use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Opacity policy for trail markers by age (0 = newest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrailDecay {
    /// `1 - age / trail_length`
    Linear,
    /// `exp(-rate * age)`
    Exponential { rate: f32 },
    /// Caller-supplied `(age, trail_length) -> factor`. The result is clamped
    /// to `[0, 1]`; monotonicity is the caller's responsibility.
    #[serde(skip)]
    Custom(fn(usize, usize) -> f32),
}

impl Default for TrailDecay {
    fn default() -> Self {
        Self::Exponential { rate: 0.2 }
    }
}

impl TrailDecay {
    /// Decay factor in `[0, 1]` for a marker `age` frames behind the newest.
    pub fn factor(&self, age: usize, trail_length: usize) -> f32 {
        let raw = match *self {
            Self::Linear => {
                if trail_length == 0 {
                    0.0
                } else {
                    1.0 - age as f32 / trail_length as f32
                }
            }
            Self::Exponential { rate } => (-rate * age as f32).exp(),
            Self::Custom(f) => f(age, trail_length),
        };
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Self::Exponential { rate } if !rate.is_finite() || rate <= 0.0 => {
                Err(TrackerError::invalid(
                    "trail_decay",
                    format!("exponential rate must be positive, got {}", rate),
                ))
            }
            _ => Ok(()),
        }
    }
}
