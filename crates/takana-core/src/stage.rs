//! Renderable nodes and the write seam timelines animate through

use std::collections::HashMap;

use tracing::trace;

use crate::geometry::Transform;
use crate::timeline::ElementId;

/// Anything timelines can write resolved properties into
pub trait AnimationTarget {
    /// Write `transform` to the node; returns false when the node is not
    /// attached, in which case nothing happens.
    fn write(&mut self, id: &ElementId, transform: Transform) -> bool;
}

/// Attached nodes and their current properties
#[derive(Debug, Default)]
pub struct Stage {
    nodes: HashMap<ElementId, Transform>,
    writes: u64,
    skipped: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node at identity; an already attached node keeps its state
    pub fn attach(&mut self, id: ElementId) {
        self.nodes.entry(id).or_insert(Transform::IDENTITY);
    }

    pub fn detach(&mut self, id: &ElementId) -> Option<Transform> {
        self.nodes.remove(id)
    }

    pub fn get(&self, id: &ElementId) -> Option<Transform> {
        self.nodes.get(id).copied()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Successful writes since creation
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Writes aimed at nodes that were not attached
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl AnimationTarget for Stage {
    fn write(&mut self, id: &ElementId, transform: Transform) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                *node = transform;
                self.writes += 1;
                true
            }
            None => {
                trace!(element = %id, "skipping write to missing node");
                self.skipped += 1;
                false
            }
        }
    }
}
