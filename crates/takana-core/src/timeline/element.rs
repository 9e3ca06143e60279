use std::fmt;

use crate::timeline::track::{Keyframe, Track};
use crate::{Error, Result};

/// Identifier of a renderable node, unique across the page (e.g. `hero.headline`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A node reference plus the schedule that animates it
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedElement {
    pub id: ElementId,
    pub track: Track,
}

impl AnimatedElement {
    /// Build from raw keyframes, validating the schedule
    pub fn new(id: impl Into<ElementId>, keyframes: Vec<Keyframe>) -> Result<Self> {
        let id = id.into();
        let track = Track::new(keyframes).map_err(|reason| Error::schedule(id.as_str(), reason))?;
        Ok(Self { id, track })
    }

    pub fn with_track(id: impl Into<ElementId>, track: Track) -> Self {
        Self {
            id: id.into(),
            track,
        }
    }
}
