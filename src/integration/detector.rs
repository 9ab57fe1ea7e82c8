//! Trait for per-frame candidate sources.

use std::convert::Infallible;

use crate::render::Image;
use crate::tracker::Candidate;

/// Per-frame object detector feeding the tracker.
///
/// Implement this trait to connect any detection backend (a cloud vision
/// API client, a local model) to the pipeline.
///
/// # Example
///
/// ```ignore
/// use balltrail_rs::{Candidate, CandidateSource, Image};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl CandidateSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, index: usize, frame: &Image, label: &str) -> Result<Vec<Candidate>, Self::Error> {
///         // Run inference and return candidates for `label`
///         Ok(vec![])
///     }
/// }
/// ```
pub trait CandidateSource {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Detect instances of `label` in one frame.
    ///
    /// # Arguments
    /// * `index` - Source frame index within the input video
    /// * `frame` - Frame image, height x width x channels
    /// * `label` - Object label to look for
    ///
    /// # Returns
    /// Zero or more candidates, or an error. Errors are absorbed by the
    /// pipeline and treated as an empty frame.
    fn detect(
        &mut self,
        index: usize,
        frame: &Image,
        label: &str,
    ) -> Result<Vec<Candidate>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Candidate`s.
pub trait IntoCandidates {
    /// Convert the output into a vector of candidates.
    fn into_candidates(self) -> Vec<Candidate>;
}

impl IntoCandidates for Vec<Candidate> {
    fn into_candidates(self) -> Vec<Candidate> {
        self
    }
}

/// Candidates computed ahead of time for every source frame, e.g. from a
/// whole-video tracking API.
#[derive(Debug, Clone, Default)]
pub struct RecordedCandidates {
    frames: Vec<Vec<Candidate>>,
}

impl RecordedCandidates {
    pub fn new<I: IntoCandidates>(frames: impl IntoIterator<Item = I>) -> Self {
        Self {
            frames: frames.into_iter().map(IntoCandidates::into_candidates).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl CandidateSource for RecordedCandidates {
    type Error = Infallible;

    /// Frames without a recording have no candidates.
    fn detect(
        &mut self,
        index: usize,
        _frame: &Image,
        _label: &str,
    ) -> Result<Vec<Candidate>, Self::Error> {
        Ok(self.frames.get(index).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_candidates_by_index() {
        let mut source = RecordedCandidates::new(vec![
            vec![],
            vec![Candidate::new(1.0, 2.0, 0.9, "ball")],
        ]);
        let frame = Image::zeros((1, 1, 3));
        assert_eq!(source.len(), 2);
        assert!(source.detect(0, &frame, "ball").unwrap().is_empty());
        assert_eq!(source.detect(1, &frame, "ball").unwrap().len(), 1);
        assert!(source.detect(7, &frame, "ball").unwrap().is_empty());
    }
}
