use nalgebra::Point2;

use crate::config::TrackerConfig;
use crate::render::canvas::fill_disc;
use crate::render::decay::TrailDecay;
use crate::render::Image;
use crate::tracker::{PositionHistory, TrackPhase};

/// One trail marker ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailMarker {
    pub position: Point2<f32>,
    /// 0 for the newest point
    pub age: usize,
    /// Decay factor, used as blend opacity
    pub alpha: f32,
    pub radius: f32,
}

/// Draws the fading ball trail.
#[derive(Debug, Clone)]
pub struct TrailRenderer {
    decay: TrailDecay,
    trail_length: usize,
    radius: f32,
    color: [u8; 3],
}

impl TrailRenderer {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            decay: config.trail_decay,
            trail_length: config.trail_length,
            radius: config.marker_radius,
            color: config.marker_color,
        }
    }

    /// Markers for the history, oldest first so newer points are drawn on top.
    ///
    /// Older markers are both more transparent and smaller, down to half the
    /// configured radius.
    pub fn markers(&self, history: &PositionHistory) -> Vec<TrailMarker> {
        let newest = history.len().saturating_sub(1);
        history
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let age = newest - i;
                let alpha = self.decay.factor(age, self.trail_length);
                TrailMarker {
                    position: point.position,
                    age,
                    alpha,
                    radius: self.radius * (0.5 + 0.5 * alpha),
                }
            })
            .collect()
    }

    /// Paint `markers` onto `image` in order.
    pub fn draw(&self, image: &mut Image, markers: &[TrailMarker]) {
        for marker in markers {
            fill_disc(image, marker.position, marker.radius, self.color, marker.alpha);
        }
    }

    /// Annotated copy of `frame`. No overlay is drawn while searching.
    pub fn render(&self, frame: &Image, history: &PositionHistory, phase: TrackPhase) -> Image {
        let mut annotated = frame.clone();
        if phase.is_active() {
            self.draw(&mut annotated, &self.markers(history));
        }
        annotated
    }
}
