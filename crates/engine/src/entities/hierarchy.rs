//! Hierarchy store operations.
//!
//! Wraps a [`NodeRepo`] with the tree rules: parents must exist, moves never
//! create cycles, and a moved subtree is rewritten as one unit. Mutations go
//! through a single writer gate so validation and the write observe the same
//! tree; reads never take the gate.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use bridge_domain::{DisplayName, DomainError, LevelKind, MaterializedPath, Node, NodeId};

use crate::infrastructure::ports::{ClockPort, NodeRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("Parent node {0} not found")]
    ParentNotFound(NodeId),
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),
    #[error("cannot move node {node}: would create a cycle through node {through}")]
    Cycle { node: NodeId, through: NodeId },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Node {node} has no ancestor at depth {depth} (deepest is {max})")]
    DepthOutOfRange {
        node: NodeId,
        depth: usize,
        max: usize,
    },
    #[error("Node {0} is not a leaf")]
    NotLeaf(NodeId),
    #[error("Domain error: {0}")]
    Domain(DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for HierarchyError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidPath(msg) => Self::InvalidPath(msg),
            other => Self::Domain(other),
        }
    }
}

/// Hierarchy operations over a node repository.
pub struct HierarchyStore {
    repo: Arc<dyn NodeRepo>,
    clock: Arc<dyn ClockPort>,
    write_gate: Mutex<()>,
}

impl HierarchyStore {
    pub fn new(repo: Arc<dyn NodeRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            repo,
            clock,
            write_gate: Mutex::new(()),
        }
    }

    /// Underlying port, for use cases that batch their own reads.
    pub fn port(&self) -> &Arc<dyn NodeRepo> {
        &self.repo
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get(&self, id: NodeId) -> Result<Option<Node>, RepoError> {
        self.repo.get(id).await
    }

    /// Lineages (root first, node last) for a batch of ids, read from one
    /// consistent view of the tree. Missing ids are skipped.
    pub async fn lineages(
        &self,
        ids: Vec<NodeId>,
    ) -> Result<HashMap<NodeId, Vec<Node>>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.repo.lineages_of(ids).await
    }

    async fn require(&self, id: NodeId) -> Result<Node, HierarchyError> {
        self.repo
            .get(id)
            .await?
            .ok_or(HierarchyError::NodeNotFound(id))
    }

    async fn lineage(&self, id: NodeId) -> Result<Vec<Node>, HierarchyError> {
        self.repo
            .lineages_of(vec![id])
            .await?
            .remove(&id)
            .ok_or(HierarchyError::NodeNotFound(id))
    }

    async fn subtree(&self, id: NodeId) -> Result<Vec<Node>, HierarchyError> {
        self.repo
            .subtree_of(id)
            .await?
            .ok_or(HierarchyError::NodeNotFound(id))
    }

    pub async fn count(&self) -> Result<usize, RepoError> {
        self.repo.count().await
    }

    pub async fn roots(&self) -> Result<Vec<Node>, RepoError> {
        self.repo.list_roots().await
    }

    pub async fn children(&self, id: NodeId) -> Result<Vec<Node>, HierarchyError> {
        let node = self.require(id).await?;
        Ok(self.repo.list_children(node.id()).await?)
    }

    /// Proper ancestors of `id`, root first. Length equals the node's depth.
    pub async fn ancestors(&self, id: NodeId) -> Result<Vec<Node>, HierarchyError> {
        let mut lineage = self.lineage(id).await?;
        lineage.pop();
        Ok(lineage)
    }

    /// Proper descendants of `id`, in path order.
    pub async fn descendants(&self, id: NodeId) -> Result<Vec<Node>, HierarchyError> {
        let mut subtree = self.subtree(id).await?;
        subtree.retain(|n| n.id() != id);
        Ok(subtree)
    }

    /// Number of nodes in the subtree rooted at `id`, the node included.
    pub async fn subtree_size(&self, id: NodeId) -> Result<usize, HierarchyError> {
        Ok(self.subtree(id).await?.len())
    }

    pub async fn is_leaf(&self, id: NodeId) -> Result<bool, HierarchyError> {
        let (_, below) = self
            .repo
            .has_descendants_of(id)
            .await?
            .ok_or(HierarchyError::NodeNotFound(id))?;
        Ok(!below)
    }

    /// Load `id` and fail with `NotLeaf` if anything hangs below it.
    ///
    /// The answer holds for the tree as it was read; an insert under the
    /// node afterwards is not prevented.
    pub async fn ensure_leaf(&self, id: NodeId) -> Result<Node, HierarchyError> {
        let (node, below) = self
            .repo
            .has_descendants_of(id)
            .await?
            .ok_or(HierarchyError::NodeNotFound(id))?;
        if below {
            return Err(HierarchyError::NotLeaf(id));
        }
        Ok(node)
    }

    /// The node at `depth` on the path of `id` (0 is the root, the node's own
    /// depth returns the node itself).
    pub async fn ancestor_at_depth(
        &self,
        id: NodeId,
        depth: usize,
    ) -> Result<Node, HierarchyError> {
        let mut lineage = self.lineage(id).await?;
        let max = lineage.len().saturating_sub(1);
        if depth >= lineage.len() {
            return Err(HierarchyError::DepthOutOfRange {
                node: id,
                depth,
                max,
            });
        }
        Ok(lineage.swap_remove(depth))
    }

    /// Deepest node that is an ancestor-or-self of both `a` and `b`.
    pub async fn nearest_common_ancestor(
        &self,
        a: NodeId,
        b: NodeId,
    ) -> Result<Option<Node>, HierarchyError> {
        let mut lineages = self.repo.lineages_of(vec![a, b]).await?;
        let left = lineages
            .remove(&a)
            .ok_or(HierarchyError::NodeNotFound(a))?;
        let right = match lineages.remove(&b) {
            Some(lineage) => lineage,
            // a == b
            None if a == b => left.clone(),
            None => return Err(HierarchyError::NodeNotFound(b)),
        };
        Ok(left
            .into_iter()
            .zip(right)
            .take_while(|(l, r)| l.id() == r.id())
            .last()
            .map(|(shared, _)| shared))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new node under `parent` (or as a root).
    pub async fn insert(
        &self,
        parent: Option<NodeId>,
        name: DisplayName,
    ) -> Result<Node, HierarchyError> {
        self.insert_node(NodeId::new(), parent, name, None).await
    }

    pub async fn insert_with_kind(
        &self,
        parent: Option<NodeId>,
        name: DisplayName,
        kind: Option<LevelKind>,
    ) -> Result<Node, HierarchyError> {
        self.insert_node(NodeId::new(), parent, name, kind).await
    }

    /// Insert with a caller-chosen id, e.g. when importing a seed file.
    pub async fn insert_node(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        name: DisplayName,
        kind: Option<LevelKind>,
    ) -> Result<Node, HierarchyError> {
        let _gate = self.write_gate.lock().await;

        let parent_node = match parent {
            Some(parent_id) => Some(
                self.repo
                    .get(parent_id)
                    .await?
                    .ok_or(HierarchyError::ParentNotFound(parent_id))?,
            ),
            None => None,
        };

        let mut node = Node::create_with_id(id, parent_node.as_ref(), name, self.clock.now())?;
        if let Some(kind) = kind {
            node = node.with_kind(kind);
        }
        self.repo.insert(&node).await?;

        tracing::debug!(
            node_id = %node.id(),
            parent_id = ?node.parent_id(),
            depth = node.depth(),
            "Inserted node"
        );
        Ok(node)
    }

    /// Re-parent `id` under `new_parent`, or promote it to a root when `None`.
    ///
    /// The node and all of its descendants get their paths rewritten in one
    /// swap; on any error the stored tree is unchanged.
    pub async fn move_node(
        &self,
        id: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<Node, HierarchyError> {
        let _gate = self.write_gate.lock().await;

        let subtree = self.subtree(id).await?;
        let node = subtree
            .iter()
            .find(|n| n.id() == id)
            .cloned()
            .ok_or(HierarchyError::NodeNotFound(id))?;
        let parent_node = match new_parent {
            Some(parent_id) => {
                if parent_id == id {
                    return Err(HierarchyError::Cycle {
                        node: id,
                        through: parent_id,
                    });
                }
                let parent = self
                    .repo
                    .get(parent_id)
                    .await?
                    .ok_or(HierarchyError::ParentNotFound(parent_id))?;
                if node.is_ancestor_of(&parent) {
                    return Err(HierarchyError::Cycle {
                        node: id,
                        through: parent_id,
                    });
                }
                Some(parent)
            }
            None => None,
        };

        if node.parent_id() == new_parent {
            tracing::debug!(node_id = %id, "Move to current parent is a no-op");
            return Ok(node);
        }

        let old_prefix = node.path().clone();
        let new_prefix = MaterializedPath::encode(parent_node.as_ref().map(Node::path), id)?;
        let now = self.clock.now();

        let rewritten = subtree
            .iter()
            .map(|n| n.rebased(&old_prefix, &new_prefix, now))
            .collect::<Result<Vec<_>, _>>()?;
        let moved = rewritten
            .iter()
            .find(|n| n.id() == id)
            .cloned()
            .ok_or(HierarchyError::NodeNotFound(id))?;
        let count = rewritten.len();

        self.repo.swap_subtree(&old_prefix, rewritten).await?;

        tracing::info!(
            node_id = %id,
            old_parent = ?node.parent_id(),
            new_parent = ?new_parent,
            rewritten = count,
            "Moved subtree"
        );
        Ok(moved)
    }

    pub async fn rename(&self, id: NodeId, name: DisplayName) -> Result<Node, HierarchyError> {
        let _gate = self.write_gate.lock().await;
        let mut node = self.require(id).await?;
        node.set_name(name, self.clock.now());
        self.repo.update(&node).await?;
        Ok(node)
    }

    pub async fn set_kind(
        &self,
        id: NodeId,
        kind: Option<LevelKind>,
    ) -> Result<Node, HierarchyError> {
        let _gate = self.write_gate.lock().await;
        let mut node = self.require(id).await?;
        node.set_kind(kind, self.clock.now());
        self.repo.update(&node).await?;
        Ok(node)
    }
}
