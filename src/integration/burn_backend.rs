//! Burn inference backend for ball detection.
//!
//! This module provides a `BurnDetector` that implements `CandidateSource`
//! for running detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use balltrail_rs::integration::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("model.bin");
//! let detector = BurnDetector::new(model, Default::default())
//!     .with_labels(vec!["person".into(), "ball".into()]);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::{CandidateBuilder, CandidateSource};
use crate::render::Image;
use crate::tracker::Candidate;

/// Error type for Burn detection failures.
#[derive(Debug, Clone, Error)]
pub enum BurnDetectorError {
    /// Input image has invalid dimensions.
    #[error("invalid input dimensions: expected {expected:?}, got {got:?}")]
    InvalidInputDimensions {
        expected: (usize, usize, usize),
        got: (usize, usize, usize),
    },
    #[error("preprocessing error: {0}")]
    PreprocessingError(String),
}

/// Raw detection output from the model.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID, looked up in the detector's label table
    pub class_id: Option<usize>,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (usize, usize, usize) {
        (3, 640, 640)
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true
    }

    /// Whether bbox output is normalized to `[0, 1]`.
    fn bbox_is_normalized(&self) -> bool {
        false
    }
}

/// Burn-based detector implementing `CandidateSource`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    conf_threshold: f32,
    labels: Vec<String>,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            conf_threshold: 0.25,
            labels: Vec::new(),
        }
    }

    /// Set the confidence threshold for discarding raw detections early.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Class names indexed by `RawDetection::class_id`.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Convert an RGB frame to a normalized `[1, C, H, W]` tensor.
    pub fn preprocess(&self, frame: &Image) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let (height, width, got_channels) = frame.dim();

        if got_channels != channels {
            return Err(BurnDetectorError::InvalidInputDimensions {
                expected: (channels, target_h, target_w),
                got: (got_channels, height, width),
            });
        }
        if height != target_h || width != target_w {
            return Err(BurnDetectorError::PreprocessingError(format!(
                "Input size {}x{} doesn't match model size {}x{}. Resize not implemented.",
                width, height, target_w, target_h
            )));
        }

        // HWC u8 -> CHW f32 in [0, 1]
        let data: Vec<f32> = frame
            .view()
            .permuted_axes([2, 0, 1])
            .iter()
            .map(|&x| x as f32 / 255.0)
            .collect();

        Ok(
            Tensor::<B, 1>::from_floats(data.as_slice(), &self.device)
                .reshape([1, channels, height, width]),
        )
    }

    /// Convert raw model outputs to candidates in frame pixel space.
    fn postprocess(
        &self,
        raw_detections: Vec<RawDetection>,
        label: &str,
        width: usize,
        height: usize,
    ) -> Vec<Candidate> {
        raw_detections
            .into_iter()
            .filter(|d| d.score >= self.conf_threshold)
            .map(|d| {
                let class = d
                    .class_id
                    .and_then(|id| self.labels.get(id))
                    .map_or(label, String::as_str);
                let builder = CandidateBuilder::new().confidence(d.score).label(class);
                let builder = if self.model.bbox_is_xywh() {
                    builder.xywh(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                } else {
                    builder.tlbr(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3])
                };
                if self.model.bbox_is_normalized() {
                    builder.normalized(width as u32, height as u32).build()
                } else {
                    builder.build()
                }
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> CandidateSource for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(
        &mut self,
        _index: usize,
        frame: &Image,
        label: &str,
    ) -> Result<Vec<Candidate>, Self::Error> {
        let (height, width, _) = frame.dim();
        let tensor = self.preprocess(frame)?;
        let raw_detections = self.model.forward(tensor);
        Ok(self.postprocess(raw_detections, label, width, height))
    }
}
