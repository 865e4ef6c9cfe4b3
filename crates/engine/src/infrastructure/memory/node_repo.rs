//! In-memory node storage with a sorted path index.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{NodeRepo, RepoError};
use bridge_domain::{MaterializedPath, Node, NodeId};

#[derive(Default)]
struct NodeIndex {
    nodes: HashMap<NodeId, Node>,
    /// Sorted paths; every subtree is one contiguous range.
    by_path: BTreeMap<MaterializedPath, NodeId>,
}

impl NodeIndex {
    /// Ids under `prefix` (inclusive), in path order.
    fn subtree_ids(&self, prefix: &MaterializedPath) -> Vec<NodeId> {
        self.by_path
            .range(prefix.clone()..)
            .take_while(|(path, _)| prefix.is_prefix_of(path))
            .map(|(_, id)| *id)
            .collect()
    }

    /// True iff some stored path lies strictly below `prefix`.
    fn has_below(&self, prefix: &MaterializedPath) -> bool {
        self.by_path
            .range((Bound::Excluded(prefix.clone()), Bound::Unbounded))
            .next()
            .is_some_and(|(path, _)| prefix.is_ancestor_of(path))
    }

    /// Nodes on `node`'s path, root first.
    fn lineage(&self, node: &Node) -> Result<Vec<Node>, RepoError> {
        node.path()
            .ids()
            .iter()
            .map(|id| {
                self.nodes.get(id).cloned().ok_or_else(|| {
                    RepoError::constraint(format!(
                        "path of node {} names missing ancestor {}",
                        node.id(),
                        id
                    ))
                })
            })
            .collect()
    }
}

fn sorted_by_name(mut nodes: Vec<Node>) -> Vec<Node> {
    nodes.sort_by(|a, b| {
        a.name()
            .as_str()
            .cmp(b.name().as_str())
            .then_with(|| a.id().cmp(&b.id()))
    });
    nodes
}

/// Node repository backed by a `HashMap` plus a `BTreeMap` path index.
#[derive(Default)]
pub struct InMemoryNodeRepo {
    index: RwLock<NodeIndex>,
}

impl InMemoryNodeRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NodeRepo for InMemoryNodeRepo {
    async fn get(&self, id: NodeId) -> Result<Option<Node>, RepoError> {
        Ok(self.index.read().await.nodes.get(&id).cloned())
    }

    async fn lineages_of(
        &self,
        ids: Vec<NodeId>,
    ) -> Result<HashMap<NodeId, Vec<Node>>, RepoError> {
        let index = self.index.read().await;
        let mut lineages = HashMap::with_capacity(ids.len());
        for id in ids {
            if lineages.contains_key(&id) {
                continue;
            }
            if let Some(node) = index.nodes.get(&id) {
                lineages.insert(id, index.lineage(node)?);
            }
        }
        Ok(lineages)
    }

    async fn insert(&self, node: &Node) -> Result<(), RepoError> {
        let mut index = self.index.write().await;
        if index.nodes.contains_key(&node.id()) {
            return Err(RepoError::constraint(format!(
                "node {} already exists",
                node.id()
            )));
        }
        if let Some(parent_path) = node.path().parent_path() {
            if !index.by_path.contains_key(&parent_path) {
                return Err(RepoError::constraint(format!(
                    "parent path {} is not stored",
                    parent_path
                )));
            }
        }
        index.by_path.insert(node.path().clone(), node.id());
        index.nodes.insert(node.id(), node.clone());
        Ok(())
    }

    async fn update(&self, node: &Node) -> Result<(), RepoError> {
        let mut index = self.index.write().await;
        let stored = index
            .nodes
            .get_mut(&node.id())
            .ok_or_else(|| RepoError::not_found("Node", node.id()))?;
        if stored.path() != node.path() {
            return Err(RepoError::constraint(format!(
                "update cannot change the path of node {}",
                node.id()
            )));
        }
        *stored = node.clone();
        Ok(())
    }

    async fn swap_subtree(
        &self,
        old_root: &MaterializedPath,
        nodes: Vec<Node>,
    ) -> Result<(), RepoError> {
        let mut guard = self.index.write().await;
        let index = &mut *guard;

        let old_ids = index.subtree_ids(old_root);
        if old_ids.is_empty() {
            return Err(RepoError::not_found("Node", old_root.leaf_id()));
        }
        let old_set: HashSet<NodeId> = old_ids.iter().copied().collect();
        let new_set: HashSet<NodeId> = nodes.iter().map(Node::id).collect();
        if old_set != new_set || new_set.len() != nodes.len() {
            return Err(RepoError::constraint(format!(
                "replacement for subtree {} does not carry the same nodes",
                old_root
            )));
        }
        for node in &nodes {
            if let Some(owner) = index.by_path.get(node.path()) {
                if !old_set.contains(owner) {
                    return Err(RepoError::constraint(format!(
                        "path {} already belongs to node {}",
                        node.path(),
                        owner
                    )));
                }
            }
        }
        // The new root's parent must exist outside the subtree being replaced.
        let new_root_parent = nodes
            .iter()
            .find(|n| n.id() == old_root.leaf_id())
            .and_then(|n| n.path().parent_path());
        if let Some(parent_path) = new_root_parent {
            let parent_ok = index
                .by_path
                .get(&parent_path)
                .is_some_and(|owner| !old_set.contains(owner));
            if !parent_ok {
                return Err(RepoError::constraint(format!(
                    "new parent path {} is not stored outside the subtree",
                    parent_path
                )));
            }
        }

        // Validation done; nothing below can fail.
        for id in &old_ids {
            if let Some(old) = index.nodes.get(id) {
                index.by_path.remove(old.path());
            }
        }
        for node in nodes {
            index.by_path.insert(node.path().clone(), node.id());
            index.nodes.insert(node.id(), node);
        }
        tracing::trace!(root = %old_root.leaf_id(), count = old_ids.len(), "Swapped subtree");
        Ok(())
    }

    async fn subtree_of(&self, id: NodeId) -> Result<Option<Vec<Node>>, RepoError> {
        let index = self.index.read().await;
        let Some(node) = index.nodes.get(&id) else {
            return Ok(None);
        };
        Ok(Some(
            index
                .subtree_ids(node.path())
                .into_iter()
                .filter_map(|member| index.nodes.get(&member).cloned())
                .collect(),
        ))
    }

    async fn has_descendants_of(&self, id: NodeId) -> Result<Option<(Node, bool)>, RepoError> {
        let index = self.index.read().await;
        Ok(index
            .nodes
            .get(&id)
            .map(|node| (node.clone(), index.has_below(node.path()))))
    }

    async fn list_children(&self, id: NodeId) -> Result<Vec<Node>, RepoError> {
        let index = self.index.read().await;
        let Some(parent) = index.nodes.get(&id) else {
            return Ok(Vec::new());
        };
        let child_depth = parent.depth() + 1;
        let children = index
            .subtree_ids(parent.path())
            .into_iter()
            .filter_map(|child_id| index.nodes.get(&child_id))
            .filter(|node| node.depth() == child_depth)
            .cloned()
            .collect();
        Ok(sorted_by_name(children))
    }

    async fn list_roots(&self) -> Result<Vec<Node>, RepoError> {
        let index = self.index.read().await;
        let roots = index
            .nodes
            .values()
            .filter(|node| node.is_root())
            .cloned()
            .collect();
        Ok(sorted_by_name(roots))
    }

    async fn count(&self) -> Result<usize, RepoError> {
        Ok(self.index.read().await.nodes.len())
    }
}
