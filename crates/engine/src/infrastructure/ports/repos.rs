//! Repository port traits for storage access.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use bridge_domain::*;

use super::error::RepoError;

// =============================================================================
// Hierarchy Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeRepo: Send + Sync {
    // Point reads
    async fn get(&self, id: NodeId) -> Result<Option<Node>, RepoError>;
    /// For each stored id, every node on its path, root first and the node
    /// itself last. Ids with no node are skipped. All lineages come from one
    /// consistent view of the tree.
    async fn lineages_of(
        &self,
        ids: Vec<NodeId>,
    ) -> Result<HashMap<NodeId, Vec<Node>>, RepoError>;

    // Writes
    /// Store a new node. Fails with `ConstraintViolation` if the id is taken.
    async fn insert(&self, node: &Node) -> Result<(), RepoError>;
    /// Replace a node's attributes. The stored path must be unchanged;
    /// paths only move through `swap_subtree`.
    async fn update(&self, node: &Node) -> Result<(), RepoError>;
    /// Replace every node under `old_root` (inclusive) with `nodes`, which
    /// must carry exactly the same ids. Readers observe all old paths or all
    /// new ones, never a mix.
    async fn swap_subtree(&self, old_root: &MaterializedPath, nodes: Vec<Node>)
        -> Result<(), RepoError>;

    // Prefix scans, keyed by id so the path lookup and the scan see the
    // same tree.
    /// The node and everything below it, in path order (the node first).
    /// `None` if `id` is not stored.
    async fn subtree_of(&self, id: NodeId) -> Result<Option<Vec<Node>>, RepoError>;
    /// The node plus whether any stored path lies strictly below it.
    /// `None` if `id` is not stored.
    async fn has_descendants_of(&self, id: NodeId) -> Result<Option<(Node, bool)>, RepoError>;

    // Listings
    async fn list_children(&self, id: NodeId) -> Result<Vec<Node>, RepoError>;
    async fn list_roots(&self) -> Result<Vec<Node>, RepoError>;
    async fn count(&self) -> Result<usize, RepoError>;
}

// =============================================================================
// Translation Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationRepo: Send + Sync {
    async fn get(&self, id: EntityId) -> Result<Option<TranslatedEntity>, RepoError>;
    /// Store a new entity. Fails with `ConstraintViolation` if the id is taken.
    async fn insert(&self, entity: &TranslatedEntity) -> Result<(), RepoError>;
    /// Apply one mutation as a single read-modify-write of the record.
    /// Returns the record after the change, `None` if it doesn't exist.
    async fn modify(
        &self,
        id: EntityId,
        mutation: TranslationMutation,
        now: DateTime<Utc>,
    ) -> Result<Option<TranslatedEntity>, RepoError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: EntityId) -> Result<bool, RepoError>;
    /// Equality lookup on one locale/attribute pair across every record.
    async fn find_by_attribute_value(
        &self,
        locale: &Locale,
        attribute: &AttributeName,
        value: &str,
    ) -> Result<Vec<EntityId>, RepoError>;
}
