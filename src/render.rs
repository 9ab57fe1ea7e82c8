//! Fading trail overlay.
//!
//! Frames are `ndarray` images laid out as height x width x channels, the
//! first three channels being RGB.

mod canvas;
mod decay;
mod trail;

pub use canvas::fill_disc;
pub use decay::TrailDecay;
pub use trail::{TrailMarker, TrailRenderer};

/// Frame buffer, shape `(height, width, channels)`.
pub type Image = ndarray::Array3<u8>;
