//! Bulk ancestor resolution.
//!
//! Given a batch of node ids, find for each one the ancestor at a target
//! level ("the country of each of these places"). Hierarchies differ in
//! depth, so the target is read off each lineage independently. The lineages
//! of the whole batch come from one read against a single view of the tree.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use bridge_domain::{LevelKind, Node, NodeId, ShortfallPolicy, TargetLevel};

use crate::entities::HierarchyStore;
use crate::infrastructure::ports::RepoError;

/// Outcome of a bulk resolution.
///
/// Every distinct input id ends up in exactly one of the two collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorResolution {
    pub resolved: HashMap<NodeId, Node>,
    pub unresolved: BTreeSet<NodeId>,
}

impl AncestorResolution {
    pub fn ancestor_of(&self, id: NodeId) -> Option<&Node> {
        self.resolved.get(&id)
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolves ancestors for batches of nodes without joins or recursion.
pub struct QueryPlanner {
    hierarchy: Arc<HierarchyStore>,
    default_policy: ShortfallPolicy,
}

impl QueryPlanner {
    pub fn new(hierarchy: Arc<HierarchyStore>, default_policy: ShortfallPolicy) -> Self {
        Self {
            hierarchy,
            default_policy,
        }
    }

    pub fn default_policy(&self) -> ShortfallPolicy {
        self.default_policy
    }

    /// Resolve `target` for every id, using the configured shortfall policy.
    pub async fn resolve_ancestor_by_level(
        &self,
        ids: impl IntoIterator<Item = NodeId>,
        target: &TargetLevel,
    ) -> Result<AncestorResolution, RepoError> {
        self.resolve_with_policy(ids, target, self.default_policy)
            .await
    }

    /// Resolve `target` for every id with an explicit shortfall policy.
    ///
    /// Ids that name no stored node are reported in `unresolved`; only a
    /// storage failure fails the batch.
    pub async fn resolve_with_policy(
        &self,
        ids: impl IntoIterator<Item = NodeId>,
        target: &TargetLevel,
        policy: ShortfallPolicy,
    ) -> Result<AncestorResolution, RepoError> {
        let requested: Vec<NodeId> = {
            let mut seen = HashSet::new();
            ids.into_iter().filter(|id| seen.insert(*id)).collect()
        };
        let mut result = AncestorResolution::default();
        if requested.is_empty() {
            return Ok(result);
        }

        let mut lineages = self.hierarchy.lineages(requested.clone()).await?;

        for id in requested {
            let Some(lineage) = lineages.remove(&id) else {
                result.unresolved.insert(id);
                continue;
            };
            match pick(lineage, target, policy) {
                Some(ancestor) => {
                    result.resolved.insert(id, ancestor);
                }
                None => {
                    result.unresolved.insert(id);
                }
            }
        }

        tracing::debug!(
            target_level = %target,
            policy = %policy,
            resolved = result.resolved.len(),
            unresolved = result.unresolved.len(),
            "Resolved ancestors"
        );
        Ok(result)
    }
}

/// Single pass over a lineage, root first and the node itself last.
///
/// The shortfall policy only covers positional targets that lie below the
/// node. A kind that appears nowhere on the lineage never resolves.
fn pick(mut lineage: Vec<Node>, target: &TargetLevel, policy: ShortfallPolicy) -> Option<Node> {
    if let TargetLevel::Kind(kind) = target {
        return lineage.into_iter().find(|n| has_kind(n, kind));
    }
    let depth = target.fixed_depth()?;
    if depth < lineage.len() {
        return Some(lineage.swap_remove(depth));
    }
    match policy {
        ShortfallPolicy::ShallowestAvailable => lineage.into_iter().next(),
        ShortfallPolicy::DeepestAvailable => lineage.pop(),
        ShortfallPolicy::Unresolved => None,
    }
}

fn has_kind(node: &Node, kind: &LevelKind) -> bool {
    node.kind() == Some(kind)
}
