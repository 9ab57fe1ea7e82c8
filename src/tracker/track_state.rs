use nalgebra::Point2;

/// Phase of the single-ball track lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackPhase {
    /// No active track
    #[default]
    Searching,
    /// Active track confirmed on the latest frame
    Tracking,
    /// Active track unconfirmed, still within the miss tolerance
    Coasting,
}

impl TrackPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Searching)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Searching => "searching",
            Self::Tracking => "tracking",
            Self::Coasting => "coasting",
        }
    }
}

/// State of the single ball track within one run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackState {
    pub phase: TrackPhase,
    pub last_accepted_position: Option<Point2<f32>>,
    pub last_accepted_frame_index: Option<u64>,
    pub consecutive_miss_count: u32,
}

impl TrackState {
    /// Record an accepted position for `frame_index`.
    pub(crate) fn accept(&mut self, frame_index: u64, position: Point2<f32>) {
        debug_assert!(
            self.last_accepted_frame_index
                .is_none_or(|last| last < frame_index)
        );
        self.phase = TrackPhase::Tracking;
        self.last_accepted_position = Some(position);
        self.last_accepted_frame_index = Some(frame_index);
        self.consecutive_miss_count = 0;
    }

    /// Record a frame without a qualifying candidate. Returns `true` if the
    /// track was dropped.
    pub(crate) fn miss(&mut self, miss_tolerance: u32) -> bool {
        self.consecutive_miss_count += 1;
        if self.consecutive_miss_count > miss_tolerance {
            *self = Self::default();
            true
        } else {
            self.phase = TrackPhase::Coasting;
            false
        }
    }
}
