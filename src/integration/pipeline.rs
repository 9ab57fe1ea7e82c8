//! FramePipeline for running detection, tracking and trail rendering over a video.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::render::{Image, TrailRenderer};
use crate::tracker::{BallTracker, Candidate, TrackPhase, TrackUpdate};

use super::CandidateSource;
use super::resampling::resample;

/// One output frame, ready for encoding.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    /// Output frame index
    pub index: usize,
    /// Index of the input frame this one was taken from
    pub source_index: usize,
    /// Presentation time in seconds at the output frame rate
    pub timestamp: f64,
    pub image: Image,
    pub phase: TrackPhase,
    pub markers_drawn: usize,
}

/// Run-level outcome. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// No input frames were supplied
    NothingToProcess,
    /// The tracker never found a moving ball; frames are unannotated
    NoTrackFound,
    /// Stopped by the caller before `processed` of `total` output frames
    Cancelled { processed: usize, total: usize },
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub frames: Vec<AnnotatedFrame>,
    pub status: RunStatus,
    /// Per-frame tracker outcomes, aligned with `frames`
    pub updates: Vec<TrackUpdate>,
    /// Detection failures absorbed as empty frames
    pub detection_failures: Vec<TrackerError>,
}

impl RunOutput {
    fn empty(status: RunStatus) -> Self {
        Self {
            frames: Vec::new(),
            status,
            updates: Vec::new(),
            detection_failures: Vec::new(),
        }
    }
}

/// Drives a candidate source, the ball tracker and the trail renderer over
/// a recorded frame sequence.
///
/// Every run starts from fresh tracker state, so one pipeline can process
/// several videos in turn.
pub struct FramePipeline<S: CandidateSource> {
    source: S,
    config: TrackerConfig,
    renderer: TrailRenderer,
}

impl<S: CandidateSource> FramePipeline<S> {
    /// Create a new pipeline, validating the configuration.
    pub fn new(source: S, config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            renderer: TrailRenderer::new(&config),
            source,
            config,
        })
    }

    /// Create a new pipeline with the default configuration.
    pub fn with_default_config(source: S) -> Self {
        let config = TrackerConfig::default();
        Self {
            renderer: TrailRenderer::new(&config),
            source,
            config,
        }
    }

    /// Process every frame without progress reporting or cancellation.
    pub fn run(&mut self, frames: &[Image], source_fps: f32) -> Result<RunOutput> {
        self.run_with(frames, source_fps, |_, _| {}, None)
    }

    /// Process `frames`, recorded at `source_fps`, into annotated frames at
    /// the configured output rate.
    ///
    /// # Arguments
    /// * `progress` - Called with `(processed, total)` after each output frame
    /// * `stop` - Checked between frames; when set, the run ends with
    ///   [`RunStatus::Cancelled`] and partial results are discarded
    ///
    /// # Returns
    /// The annotated frames and run status, or an `InvalidConfiguration`
    /// error raised before any frame is processed.
    pub fn run_with(
        &mut self,
        frames: &[Image],
        source_fps: f32,
        mut progress: impl FnMut(usize, usize),
        stop: Option<&AtomicBool>,
    ) -> Result<RunOutput> {
        let selected = resample(source_fps, self.config.output_fps, frames.len())?;
        let mut tracker = BallTracker::new(self.config.clone())?;

        if frames.is_empty() {
            info!("no input frames, nothing to process");
            return Ok(RunOutput::empty(RunStatus::NothingToProcess));
        }

        let total = selected.len();
        info!(
            input_frames = frames.len(),
            output_frames = total,
            source_fps,
            output_fps = self.config.output_fps,
            label = %self.config.object_label,
            "processing video"
        );

        let mut output = Vec::with_capacity(total);
        let mut updates = Vec::with_capacity(total);
        let mut failures = Vec::new();
        let mut detected: BTreeMap<usize, Vec<Candidate>> = BTreeMap::new();

        for (k, &src) in selected.iter().enumerate() {
            if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
                info!(processed = k, total, "run cancelled");
                return Ok(RunOutput {
                    detection_failures: failures,
                    ..RunOutput::empty(RunStatus::Cancelled {
                        processed: k,
                        total,
                    })
                });
            }

            // A repeated source frame holds the previous result
            if k > 0 && selected[k - 1] == src {
                let update = tracker.hold();
                let (image, markers_drawn) = {
                    let previous: &AnnotatedFrame = &output[k - 1];
                    (previous.image.clone(), previous.markers_drawn)
                };
                output.push(AnnotatedFrame {
                    index: k,
                    source_index: src,
                    timestamp: k as f64 / self.config.output_fps as f64,
                    image,
                    phase: update.phase(),
                    markers_drawn,
                });
                updates.push(update);
                progress(k + 1, total);
                continue;
            }

            detected = detected.split_off(&src);
            // Look-ahead uses the next distinct source frame
            let next_src = selected[k + 1..].iter().copied().find(|&s| s != src);
            self.detect_once(src, frames, &mut detected, &mut failures);
            if let Some(n) = next_src {
                self.detect_once(n, frames, &mut detected, &mut failures);
            }

            let current = detected.get(&src).map(Vec::as_slice).unwrap_or_default();
            let next = next_src.and_then(|n| detected.get(&n)).map(Vec::as_slice);
            let update = tracker.update_with_next(current, next);

            let markers = if update.phase().is_active() {
                self.renderer.markers(tracker.history())
            } else {
                Vec::new()
            };
            let mut image = frames[src].clone();
            self.renderer.draw(&mut image, &markers);

            output.push(AnnotatedFrame {
                index: k,
                source_index: src,
                timestamp: k as f64 / self.config.output_fps as f64,
                image,
                phase: update.phase(),
                markers_drawn: markers.len(),
            });
            updates.push(update);
            progress(k + 1, total);
        }

        let accepted = updates.iter().filter(|u| u.accepted.is_some()).count();
        let status = if accepted == 0 {
            RunStatus::NoTrackFound
        } else {
            RunStatus::Completed
        };
        info!(
            accepted,
            detection_failures = failures.len(),
            ?status,
            "run finished"
        );

        Ok(RunOutput {
            frames: output,
            status,
            updates,
            detection_failures: failures,
        })
    }

    /// Query the source for frame `index` unless it is already cached.
    fn detect_once(
        &mut self,
        index: usize,
        frames: &[Image],
        detected: &mut BTreeMap<usize, Vec<Candidate>>,
        failures: &mut Vec<TrackerError>,
    ) {
        if detected.contains_key(&index) {
            return;
        }
        let candidates = match self
            .source
            .detect(index, &frames[index], &self.config.object_label)
        {
            Ok(candidates) => candidates,
            Err(e) => {
                let err = TrackerError::DetectionUnavailable {
                    frame: index,
                    message: e.to_string(),
                };
                warn!(%err, "treating frame as having no candidates");
                failures.push(err);
                Vec::new()
            }
        };
        detected.insert(index, candidates);
    }

    /// Get a reference to the underlying candidate source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying candidate source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::RecordedCandidates;

    struct FailingDetector {
        calls: usize,
    }

    impl CandidateSource for FailingDetector {
        type Error = String;

        fn detect(
            &mut self,
            index: usize,
            _frame: &Image,
            _label: &str,
        ) -> std::result::Result<Vec<Candidate>, Self::Error> {
            self.calls += 1;
            if index % 2 == 1 {
                Err("timeout".to_string())
            } else {
                Ok(vec![Candidate::new(10.0 * index as f32, 5.0, 0.95, "ball")])
            }
        }
    }

    fn blank_frames(n: usize) -> Vec<Image> {
        (0..n).map(|_| Image::zeros((16, 64, 3))).collect()
    }

    #[test]
    fn test_detection_failures_are_absorbed() {
        let config = TrackerConfig {
            output_fps: 30.0,
            ..TrackerConfig::default()
        };
        let mut pipeline = FramePipeline::new(FailingDetector { calls: 0 }, config).unwrap();
        let out = pipeline.run(&blank_frames(4), 30.0).unwrap();

        assert_eq!(out.frames.len(), 4);
        assert_eq!(out.detection_failures.len(), 2);
        assert_eq!(out.status, RunStatus::Completed);
        // Each source frame is queried exactly once despite the look-ahead
        assert_eq!(pipeline.source().calls, 4);
        assert!(matches!(
            out.detection_failures[0],
            TrackerError::DetectionUnavailable { frame: 1, .. }
        ));
    }

    #[test]
    fn test_empty_input() {
        let mut pipeline = FramePipeline::with_default_config(RecordedCandidates::default());
        let out = pipeline.run(&[], 30.0).unwrap();
        assert_eq!(out.status, RunStatus::NothingToProcess);
        assert!(out.frames.is_empty());
    }

    #[test]
    fn test_invalid_source_rate_fails_before_work() {
        let mut pipeline = FramePipeline::new(FailingDetector { calls: 0 }, TrackerConfig::default())
            .unwrap();
        let err = pipeline.run(&blank_frames(3), 0.0).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::InvalidConfiguration { field: "source_fps", .. }
        ));
        assert_eq!(pipeline.source().calls, 0);
    }

    #[test]
    fn test_timestamps_follow_output_rate() {
        let mut pipeline = FramePipeline::with_default_config(RecordedCandidates::default());
        let out = pipeline.run(&blank_frames(6), 30.0).unwrap();
        let stamps: Vec<f64> = out.frames.iter().map(|f| f.timestamp).collect();
        assert_eq!(out.frames.len(), 3);
        assert!((stamps[1] - 1.0 / 15.0).abs() < 1e-9);
        assert!((stamps[2] - 2.0 / 15.0).abs() < 1e-9);
    }
}
