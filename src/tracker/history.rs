//! Bounded position history of the accepted ball track.

use std::collections::VecDeque;

use nalgebra::Point2;

/// One accepted ball position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub frame_index: u64,
    pub position: Point2<f32>,
}

/// Oldest-first FIFO of accepted positions, never longer than its capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionHistory {
    points: VecDeque<TrackPoint>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest entry on overflow.
    pub fn push(&mut self, point: TrackPoint) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&TrackPoint> {
        self.points.back()
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TrackPoint> + ExactSizeIterator {
        self.points.iter()
    }

    /// Up to `n` most recent points, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &TrackPoint> {
        self.points.iter().rev().take(n)
    }
}
