//! Hierarchy node - one element of the world region tree
//!
//! # Materialized Path Design
//!
//! Every node stores its full ancestry as a `MaterializedPath`. The parent
//! link is kept alongside for readability but is always the second-to-last
//! path element; both are replaced together whenever the path changes.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: the id, parent link and path can only change together
//! - **Valid by construction**: `create()` encodes the path from the parent
//! - **Builder pattern**: Fluent API for optional fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{DisplayName, LevelKind, MaterializedPath};
use bridge_domain::NodeId;

/// A node in the location hierarchy (country, region, department...)
///
/// # Invariants
///
/// - `path` ends with `id`
/// - `parent_id` equals the second-to-last element of `path`, `None` for roots
/// - `path` never repeats an id (enforced by `MaterializedPath`)
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use bridge_domain::{DisplayName, Node};
///
/// let now = Utc::now();
/// let france = Node::create(None, DisplayName::new("France").unwrap(), now).unwrap();
/// let savoie = Node::create(Some(&france), DisplayName::new("Savoie").unwrap(), now).unwrap();
///
/// assert_eq!(savoie.depth(), 1);
/// assert_eq!(savoie.parent_id(), Some(france.id()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    // Identity
    id: NodeId,
    parent_id: Option<NodeId>,

    // Core attributes
    name: DisplayName,
    kind: Option<LevelKind>,

    // Ancestry, root first, self last
    path: MaterializedPath,

    // Timestamps
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Node {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a node with a fresh id under `parent` (or as a root).
    pub fn create(
        parent: Option<&Node>,
        name: DisplayName,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::create_with_id(NodeId::new(), parent, name, now)
    }

    /// Create a node with a caller-supplied id (used when importing).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if `id` already occurs in the
    /// parent's path.
    pub fn create_with_id(
        id: NodeId,
        parent: Option<&Node>,
        name: DisplayName,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let path = MaterializedPath::encode(parent.map(|p| &p.path), id)?;
        Ok(Self {
            id,
            parent_id: path.parent_id(),
            name,
            kind: None,
            path,
            created_at: now,
            updated_at: now,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    #[inline]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> Option<&LevelKind> {
        self.kind.as_ref()
    }

    #[inline]
    pub fn path(&self) -> &MaterializedPath {
        &self.path
    }

    /// Derived from the path; there is no way to set it.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_kind(mut self, kind: LevelKind) -> Self {
        self.kind = Some(kind);
        self
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    pub fn set_name(&mut self, name: DisplayName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    pub fn set_kind(&mut self, kind: Option<LevelKind>, now: DateTime<Utc>) {
        self.kind = kind;
        self.updated_at = now;
    }

    /// Copy of this node with `old_prefix` replaced by `new_prefix`.
    ///
    /// Applied to the moved node and each of its descendants; the parent link
    /// is re-derived from the new path so the two never disagree.
    pub fn rebased(
        &self,
        old_prefix: &MaterializedPath,
        new_prefix: &MaterializedPath,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let path = self.path.rebase(old_prefix, new_prefix)?;
        Ok(Self {
            parent_id: path.parent_id(),
            path,
            updated_at: now,
            ..self.clone()
        })
    }

    // =========================================================================
    // Domain Methods
    // =========================================================================

    /// True iff `self` sits strictly above `other`.
    pub fn is_ancestor_of(&self, other: &Node) -> bool {
        self.path.is_ancestor_of(&other.path)
    }

    /// The id at `depth` on this node's path.
    pub fn ancestor_id_at(&self, depth: usize) -> Result<NodeId, DomainError> {
        self.path.ancestor_at(depth)
    }
}
