//! Target levels for bulk ancestor resolution
//!
//! A caller asks for "the country of each of these leaves" or "the ancestor at
//! depth 1". Hierarchies do not share a depth layout (France has two levels
//! below the country, the USA one), so a target can be positional or
//! semantic, and a policy decides what happens when a path is too short.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::LevelKind;

// ============================================================================
// Target Level
// ============================================================================

/// Which ancestor to resolve for each node in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetLevel {
    /// The root of each path (depth 0). `"country"` parses to this.
    Root,
    /// A fixed position in the path.
    Depth(usize),
    /// The shallowest ancestor whose node kind matches. A path with no such
    /// node leaves the id unresolved whatever the shortfall policy.
    Kind(LevelKind),
}

impl TargetLevel {
    /// Path index this level points at, when it is positional.
    pub fn fixed_depth(&self) -> Option<usize> {
        match self {
            Self::Root => Some(0),
            Self::Depth(depth) => Some(*depth),
            Self::Kind(_) => None,
        }
    }
}

impl fmt::Display for TargetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Depth(depth) => write!(f, "{}", depth),
            Self::Kind(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for TargetLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "root" | "country" => Ok(Self::Root),
            other => {
                if let Ok(depth) = other.parse::<usize>() {
                    return Ok(Self::Depth(depth));
                }
                LevelKind::new(trimmed)
                    .map(Self::Kind)
                    .map_err(|_| DomainError::parse(format!("Unknown target level: {}", s)))
            }
        }
    }
}

impl TryFrom<String> for TargetLevel {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TargetLevel> for String {
    fn from(level: TargetLevel) -> String {
        level.to_string()
    }
}

// ============================================================================
// Shortfall Policy
// ============================================================================

/// What to do when a positional level lies deeper than the path.
///
/// Only applies to [`TargetLevel::Root`] and [`TargetLevel::Depth`].
/// [`TargetLevel::Kind`] never falls back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Resolve to the root of the path.
    #[default]
    ShallowestAvailable,
    /// Resolve to the deepest node of the path (the node itself).
    DeepestAvailable,
    /// Report the node as unresolved.
    Unresolved,
}

impl fmt::Display for ShortfallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShallowestAvailable => write!(f, "shallowest"),
            Self::DeepestAvailable => write!(f, "deepest"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

impl FromStr for ShortfallPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shallowest" | "shallowest_available" | "root" => Ok(Self::ShallowestAvailable),
            "deepest" | "deepest_available" | "self" => Ok(Self::DeepestAvailable),
            "unresolved" | "skip" => Ok(Self::Unresolved),
            _ => Err(DomainError::parse(format!(
                "Unknown shortfall policy: {}",
                s
            ))),
        }
    }
}
