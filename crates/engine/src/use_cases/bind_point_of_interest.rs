//! Binding points of interest to hierarchy nodes.
//!
//! A point of interest may only reference a leaf. The check runs at binding
//! time; a later insert under the node does not unbind anything, so callers
//! that care can re-validate with [`PointOfInterestBinder::validate`].

use std::sync::Arc;

use bridge_domain::{NodeId, PointOfInterest};

use crate::entities::{HierarchyError, HierarchyStore};

pub struct PointOfInterestBinder {
    hierarchy: Arc<HierarchyStore>,
}

impl PointOfInterestBinder {
    pub fn new(hierarchy: Arc<HierarchyStore>) -> Self {
        Self { hierarchy }
    }

    /// Bind `poi` to `node_id`.
    ///
    /// The leaf check runs once, against the tree as it is read. An insert
    /// under the node afterwards is not prevented; `validate` re-checks a
    /// stored binding.
    ///
    /// # Errors
    ///
    /// * `NodeNotFound` - `node_id` is not stored
    /// * `NotLeaf` - `node_id` has descendants
    pub async fn bind(
        &self,
        mut poi: PointOfInterest,
        node_id: NodeId,
    ) -> Result<PointOfInterest, HierarchyError> {
        let node = self.hierarchy.ensure_leaf(node_id).await?;
        poi.bind(node.id());
        tracing::debug!(poi_id = %poi.id(), node_id = %node_id, "Bound point of interest");
        Ok(poi)
    }

    /// Check that an existing binding still targets a stored leaf.
    /// Unbound points of interest are always valid.
    pub async fn validate(&self, poi: &PointOfInterest) -> Result<(), HierarchyError> {
        if let Some(node_id) = poi.world_node_id() {
            self.hierarchy.ensure_leaf(node_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::InMemoryNodeRepo;
    use bridge_domain::DisplayName;
    use chrono::Utc;

    fn name(s: &str) -> DisplayName {
        DisplayName::new(s).unwrap()
    }

    fn hierarchy() -> Arc<HierarchyStore> {
        Arc::new(HierarchyStore::new(
            Arc::new(InMemoryNodeRepo::new()),
            Arc::new(FixedClock(Utc::now())),
        ))
    }

    #[tokio::test]
    async fn binds_to_a_leaf() {
        let hierarchy = hierarchy();
        let france = hierarchy.insert(None, name("France")).await.unwrap();
        let savoie = hierarchy
            .insert(Some(france.id()), name("Savoie"))
            .await
            .unwrap();
        let binder = PointOfInterestBinder::new(hierarchy);

        let poi = binder
            .bind(PointOfInterest::new(name("Mont Blanc")), savoie.id())
            .await
            .unwrap();
        assert_eq!(poi.world_node_id(), Some(savoie.id()));
        binder.validate(&poi).await.unwrap();
    }

    #[tokio::test]
    async fn when_node_has_children_then_binding_fails() {
        let hierarchy = hierarchy();
        let france = hierarchy.insert(None, name("France")).await.unwrap();
        hierarchy
            .insert(Some(france.id()), name("Savoie"))
            .await
            .unwrap();
        let binder = PointOfInterestBinder::new(hierarchy);

        let err = binder
            .bind(PointOfInterest::new(name("Eiffel Tower")), france.id())
            .await
            .unwrap_err();
        assert!(matches!(err, HierarchyError::NotLeaf(id) if id == france.id()));
    }

    #[tokio::test]
    async fn validate_catches_a_node_that_gained_children() {
        let hierarchy = hierarchy();
        let usa = hierarchy.insert(None, name("USA")).await.unwrap();
        let binder = PointOfInterestBinder::new(hierarchy.clone());
        let poi = binder
            .bind(PointOfInterest::new(name("Statue of Liberty")), usa.id())
            .await
            .unwrap();

        hierarchy
            .insert(Some(usa.id()), name("New York"))
            .await
            .unwrap();
        let err = binder.validate(&poi).await.unwrap_err();
        assert!(matches!(err, HierarchyError::NotLeaf(_)));

        binder
            .validate(&PointOfInterest::new(name("Unplaced")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn when_node_missing_then_binding_fails() {
        let binder = PointOfInterestBinder::new(hierarchy());
        let err = binder
            .bind(PointOfInterest::new(name("Atlantis")), NodeId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HierarchyError::NodeNotFound(_)));
    }
}
