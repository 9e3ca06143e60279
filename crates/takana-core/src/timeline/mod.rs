//! Keyframe schedules and their playback
//!
//! - `track` - Ordered keyframes and interpolation
//! - `element` - Node ids and the track animating each node
//! - `pinned` - Entrance/dwell/exit schedules for pinned sections
//! - `reveal` - One-shot banded reveals for inline sections
//! - `intro` - Time-based intro sequences
//! - `scrub` - Scroll-linked playback with optional smoothing

pub mod element;
pub mod intro;
pub mod pinned;
pub mod reveal;
pub mod scrub;
pub mod track;

pub use element::{AnimatedElement, ElementId};
pub use intro::{IntroBuilder, IntroTimeline};
pub use pinned::{PinPhases, PinnedMotion};
pub use reveal::{Reveal, RevealBand, RevealGroup};
pub use scrub::{FrameContext, ScrubTimeline};
pub use track::{Keyframe, Track};
