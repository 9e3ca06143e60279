pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod motion;
pub mod nav;
pub mod registry;
pub mod section;
pub mod site;
pub mod snap;
pub mod stage;
pub mod timeline;

pub use config::{AppConfig, EngineConfig, SnapConfig};
pub use engine::ScrollEngine;
pub use error::{Error, Result};
pub use geometry::{Length, Transform, Viewport, VisualState};
pub use registry::{SectionHandle, TriggerRegistry};
pub use section::{SectionDescriptor, SectionId, SectionKind};
pub use snap::{PinnedRange, SnapRule};
pub use stage::{AnimationTarget, Stage};
pub use timeline::ElementId;
