//! Motion primitives shared by timelines and snap transitions
//!
//! - `easing` - Pure easing curves
//! - `timing` - Progress, interpolation and smoothing helpers

pub mod easing;
pub mod timing;

pub use easing::Ease;
pub use timing::{band_progress, lerp, smooth_toward};
