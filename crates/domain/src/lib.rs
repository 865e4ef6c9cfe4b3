//! Bridge Domain - core types for location hierarchies and translations.
//!
//! Pure data and validation: no I/O and no async. Storage and tree-wide rules
//! live in `bridge-engine`.

extern crate self as bridge_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{Node, PointOfInterest, TranslatedEntity, TranslationMutation, Translations};

pub use error::DomainError;

// Re-export ID types
pub use ids::{EntityId, NodeId, PointOfInterestId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    AttributeName, DisplayName, LevelKind, Locale, MaterializedPath, ShortfallPolicy, TargetLevel,
};
