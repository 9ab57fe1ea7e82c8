use crate::error::{Result, TrackerError};

/// Longest output sequence a run may produce.
pub const MAX_OUTPUT_FRAMES: usize = 1 << 24;

/// Source frame indices to emit so that `frame_count` frames recorded at
/// `source_fps` play back at `target_fps`.
///
/// Output frame `k` shows the source frame on screen at time `k / target_fps`.
/// Downsampling drops evenly spaced frames, upsampling repeats them; the
/// result is always non-decreasing.
pub fn resample(source_fps: f32, target_fps: f32, frame_count: usize) -> Result<Vec<usize>> {
    if !source_fps.is_finite() || source_fps <= 0.0 {
        return Err(TrackerError::invalid(
            "source_fps",
            format!("must be positive, got {}", source_fps),
        ));
    }
    if !target_fps.is_finite() || target_fps <= 0.0 {
        return Err(TrackerError::invalid(
            "output_fps",
            format!("must be positive, got {}", target_fps),
        ));
    }

    let step = source_fps as f64 / target_fps as f64;
    let projected = (frame_count as f64 / step).ceil();
    if !projected.is_finite() || projected > MAX_OUTPUT_FRAMES as f64 {
        return Err(TrackerError::invalid(
            "output_fps",
            format!(
                "{} fps from {} fps source frames would exceed {} output frames",
                target_fps, source_fps, MAX_OUTPUT_FRAMES
            ),
        ));
    }

    let mut selected = Vec::new();
    for k in 0usize.. {
        // Epsilon absorbs rounding in k * step for integral ratios
        let idx = (k as f64 * step + 1e-9).floor() as usize;
        if idx >= frame_count {
            break;
        }
        selected.push(idx);
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halving() {
        let selected = resample(30.0, 15.0, 30).unwrap();
        assert_eq!(selected.len(), 15);
        assert_eq!(selected, (0..30).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_rate_is_identity() {
        assert_eq!(resample(25.0, 25.0, 5).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_fractional_ratio() {
        assert_eq!(resample(30.0, 20.0, 6).unwrap(), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_upsampling_duplicates() {
        assert_eq!(resample(15.0, 30.0, 3).unwrap(), vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(resample(30.0, 15.0, 0).unwrap().is_empty());
        assert!(resample(0.0, 15.0, 10).is_err());
        assert!(resample(30.0, -1.0, 10).is_err());
        assert!(resample(30.0, f32::NAN, 10).is_err());
    }

    #[test]
    fn test_runaway_upsampling_rejected() {
        match resample(1.0, 1e20, 2) {
            Err(TrackerError::InvalidConfiguration { field, .. }) => assert_eq!(field, "output_fps"),
            other => panic!("unexpected result: {:?}", other),
        }
        // Large but bounded ratios still work
        assert_eq!(resample(1.0, 1000.0, 2).unwrap().len(), 2000);
    }
}
