mod ball_tracker;
mod history;
mod matching;
mod motion_filter;
mod rect;
mod track_state;

pub use ball_tracker::{BallTracker, TrackUpdate};
pub use history::{PositionHistory, TrackPoint};
pub use matching::{Candidate, distances, most_confident, nearest};
pub use motion_filter::MotionFilter;
pub use rect::Rect;
pub use track_state::{TrackPhase, TrackState};
