//! Materialized paths for the location hierarchy
//!
//! A path is the ordered list of node ids from a root down to (and including)
//! the node itself. Paths compare lexicographically element by element, so in
//! a sorted index every descendant of `X` sits in one contiguous run directly
//! after `X`. Prefix scans replace both join chains and recursive walks.
//!
//! The text form joins ids with `/`:
//!
//! ```text
//! 6f1c.../a93e.../0b27...
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::NodeId;

const SEPARATOR: char = '/';

/// Root-to-self sequence of node ids. Never empty, never repeats an id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MaterializedPath(Vec<NodeId>);

impl MaterializedPath {
    /// Path of a root node.
    pub fn root(id: NodeId) -> Self {
        Self(vec![id])
    }

    /// Encode the path of `id` placed under `parent` (or as a root).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if `id` already occurs in the parent
    /// path, which would make the node its own ancestor.
    pub fn encode(parent: Option<&MaterializedPath>, id: NodeId) -> Result<Self, DomainError> {
        match parent {
            Some(parent) => parent.child(id),
            None => Ok(Self::root(id)),
        }
    }

    /// Append `id` to this path.
    pub fn child(&self, id: NodeId) -> Result<Self, DomainError> {
        if self.contains(id) {
            return Err(DomainError::invalid_path(format!(
                "node {} already occurs in path {}",
                id, self
            )));
        }
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id);
        Ok(Self(ids))
    }

    /// Build a path from raw ids, checking the non-empty and no-repeat rules.
    pub fn from_ids(ids: Vec<NodeId>) -> Result<Self, DomainError> {
        if ids.is_empty() {
            return Err(DomainError::invalid_path("path cannot be empty"));
        }
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(DomainError::invalid_path(format!(
                    "node {} occurs more than once",
                    id
                )));
            }
        }
        Ok(Self(ids))
    }

    /// The id stored at `depth` (0 is the root).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DepthOutOfRange` if `depth >= len`.
    pub fn ancestor_at(&self, depth: usize) -> Result<NodeId, DomainError> {
        self.0
            .get(depth)
            .copied()
            .ok_or_else(|| DomainError::depth_out_of_range(depth, self.0.len()))
    }

    /// True iff `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &MaterializedPath) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// True iff `self` is a prefix of `other`, or equal to it.
    pub fn is_prefix_of(&self, other: &MaterializedPath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Length of the longest shared prefix. Zero means different roots.
    pub fn common_prefix_depth(&self, other: &MaterializedPath) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Number of edges between the root and this node.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    /// The node this path belongs to.
    pub fn leaf_id(&self) -> NodeId {
        self.0[self.0.len() - 1]
    }

    pub fn root_id(&self) -> NodeId {
        self.0[0]
    }

    /// Path of the immediate parent, `None` for roots.
    pub fn parent_path(&self) -> Option<MaterializedPath> {
        if self.0.len() > 1 {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        if self.0.len() > 1 {
            Some(self.0[self.0.len() - 2])
        } else {
            None
        }
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    /// Ids strictly above this node, root first.
    pub fn ancestor_ids(&self) -> &[NodeId] {
        &self.0[..self.0.len() - 1]
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    /// Replace `old_prefix` with `new_prefix`, keeping the suffix below it.
    ///
    /// This is the per-node step of a subtree rewrite.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if `old_prefix` is not a prefix of
    /// this path, or if the result would repeat an id.
    pub fn rebase(
        &self,
        old_prefix: &MaterializedPath,
        new_prefix: &MaterializedPath,
    ) -> Result<Self, DomainError> {
        if !old_prefix.is_prefix_of(self) {
            return Err(DomainError::invalid_path(format!(
                "{} is not a prefix of {}",
                old_prefix, self
            )));
        }
        let suffix = &self.0[old_prefix.0.len()..];
        if let Some(id) = suffix.iter().find(|id| new_prefix.contains(**id)) {
            return Err(DomainError::invalid_path(format!(
                "node {} would occur twice after rebasing onto {}",
                id, new_prefix
            )));
        }
        let mut ids = Vec::with_capacity(new_prefix.0.len() + suffix.len());
        ids.extend_from_slice(&new_prefix.0);
        ids.extend_from_slice(suffix);
        Ok(Self(ids))
    }
}

impl fmt::Display for MaterializedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

impl FromStr for MaterializedPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_path("path cannot be empty"));
        }
        let ids = trimmed
            .split(SEPARATOR)
            .map(|segment| {
                segment
                    .parse::<NodeId>()
                    .map_err(|_| DomainError::invalid_path(format!("bad segment '{}'", segment)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_ids(ids)
    }
}

impl TryFrom<String> for MaterializedPath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MaterializedPath> for String {
    fn from(path: MaterializedPath) -> String {
        path.to_string()
    }
}
