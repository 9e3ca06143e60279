//! Snapping scroll to the center of pinned sections
//!
//! - `rule` - Pure fraction-to-fraction snap function over pinned ranges
//! - `coordinator` - Deferred install and recompute of the page-wide rule
//! - `transition` - Bounded, eased scroll transition toward a target

pub mod coordinator;
pub mod rule;
pub mod transition;

pub use coordinator::{CoordinatorState, SnapCoordinator};
pub use rule::{PinnedRange, SnapRule};
pub use transition::ScrollTransition;
