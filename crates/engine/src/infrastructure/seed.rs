//! JSON seed import for the hierarchy.
//!
//! A seed file is a JSON array of root nodes, each with nested children:
//!
//! ```json
//! [
//!   { "name": "France", "kind": "country", "children": [
//!     { "name": "Rhône-Alpes", "kind": "region", "children": [
//!       { "name": "Savoie", "kind": "department" }
//!     ]}
//!   ]},
//!   { "id": "5f0c...", "name": "USA", "children": [{ "name": "New York" }] }
//! ]
//! ```
//!
//! Nodes are inserted depth-first, parents before children, through the
//! regular `HierarchyStore::insert_node` path so every invariant is checked.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

use bridge_domain::{DisplayName, DomainError, LevelKind, NodeId};

use crate::entities::{HierarchyError, HierarchyStore};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid seed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid seed node '{name}': {source}")]
    Node {
        name: String,
        #[source]
        source: DomainError,
    },
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedNode {
    /// Stable id; a fresh one is generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub children: Vec<SeedNode>,
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roots: usize,
    pub nodes: usize,
    pub max_depth: usize,
}

pub fn parse_seed(json: &str) -> Result<Vec<SeedNode>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

pub async fn load_seed_file(path: &Path) -> Result<Vec<SeedNode>, SeedError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_seed(&json)
}

/// Insert `roots` and all their descendants.
///
/// Stops at the first failing node; nodes inserted before it stay in place.
pub async fn import_seed(
    hierarchy: &HierarchyStore,
    roots: &[SeedNode],
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport {
        roots: roots.len(),
        ..SeedReport::default()
    };

    // Explicit stack instead of recursion: async fns cannot recurse without boxing.
    let mut pending: Vec<(Option<NodeId>, &SeedNode)> =
        roots.iter().rev().map(|root| (None, root)).collect();
    while let Some((parent, seed)) = pending.pop() {
        let name = DisplayName::new(seed.name.as_str()).map_err(|source| SeedError::Node {
            name: seed.name.clone(),
            source,
        })?;
        let kind = seed
            .kind
            .as_deref()
            .map(LevelKind::new)
            .transpose()
            .map_err(|source| SeedError::Node {
                name: seed.name.clone(),
                source,
            })?;
        let id = seed.id.map(NodeId::from_uuid).unwrap_or_default();

        let node = hierarchy.insert_node(id, parent, name, kind).await?;
        report.nodes += 1;
        report.max_depth = report.max_depth.max(node.depth());

        pending.extend(seed.children.iter().rev().map(|child| (Some(node.id()), child)));
    }

    tracing::info!(
        roots = report.roots,
        nodes = report.nodes,
        max_depth = report.max_depth,
        "Imported hierarchy seed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::InMemoryNodeRepo;
    use chrono::Utc;
    use std::io::Write;
    use std::sync::Arc;

    const SEED: &str = r#"[
        {"name": "France", "kind": "country", "children": [
            {"name": "Rhône-Alpes", "kind": "region", "children": [
                {"name": "Savoie", "kind": "department"}
            ]}
        ]},
        {"id": "6b1d8f5e-7c3a-4c1e-9f2b-0d4e5a6b7c8d", "name": "USA", "children": [
            {"name": "New York"}
        ]}
    ]"#;

    fn hierarchy() -> HierarchyStore {
        HierarchyStore::new(
            Arc::new(InMemoryNodeRepo::new()),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    #[tokio::test]
    async fn imports_nested_nodes_depth_first() {
        let hierarchy = hierarchy();
        let roots = parse_seed(SEED).unwrap();

        let report = import_seed(&hierarchy, &roots).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                roots: 2,
                nodes: 5,
                max_depth: 2
            }
        );

        let usa_id: NodeId = "6b1d8f5e-7c3a-4c1e-9f2b-0d4e5a6b7c8d".parse().unwrap();
        let children = hierarchy.children(usa_id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name().as_str(), "New York");

        let roots = hierarchy.roots().await.unwrap();
        let france = roots.iter().find(|n| n.name().as_str() == "France").unwrap();
        assert_eq!(france.kind().map(LevelKind::as_str), Some("country"));
        assert_eq!(hierarchy.subtree_size(france.id()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let roots = load_seed_file(file.path()).await.unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children[0].children[0].name, "Savoie");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed_file(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_seed(r#"[{"name": "France", "parent": "x"}]"#).unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }

    #[tokio::test]
    async fn invalid_name_stops_the_import() {
        let hierarchy = hierarchy();
        let roots = parse_seed(r#"[{"name": "France", "children": [{"name": "   "}]}]"#).unwrap();

        let err = import_seed(&hierarchy, &roots).await.unwrap_err();
        assert!(matches!(err, SeedError::Node { .. }));
        assert_eq!(hierarchy.count().await.unwrap(), 1);
    }
}
