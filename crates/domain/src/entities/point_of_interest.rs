//! Point of interest - an entity placed on a leaf of the hierarchy

use serde::{Deserialize, Serialize};

use crate::value_objects::DisplayName;
use bridge_domain::{NodeId, PointOfInterestId};

/// A place tagged with a world node (a museum, a ski resort...).
///
/// The bound node must be a leaf when the binding is made. The domain cannot
/// see the tree, so the check lives with the hierarchy store; see
/// `PointOfInterestBinder` in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    id: PointOfInterestId,
    name: DisplayName,
    world_node_id: Option<NodeId>,
}

impl PointOfInterest {
    pub fn new(name: DisplayName) -> Self {
        Self {
            id: PointOfInterestId::new(),
            name,
            world_node_id: None,
        }
    }

    /// Set the ID (used when loading from storage).
    pub fn with_id(mut self, id: PointOfInterestId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> PointOfInterestId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    #[inline]
    pub fn world_node_id(&self) -> Option<NodeId> {
        self.world_node_id
    }

    pub fn is_bound(&self) -> bool {
        self.world_node_id.is_some()
    }

    /// Record the binding. Callers must have verified the node is a leaf.
    pub fn bind(&mut self, node_id: NodeId) {
        self.world_node_id = Some(node_id);
    }

    pub fn unbind(&mut self) {
        self.world_node_id = None;
    }
}
