//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps a repository port with the rules of its entity type.
//! They are the building blocks for use cases.

pub mod hierarchy;
pub mod translation;

pub use hierarchy::{HierarchyError, HierarchyStore};
pub use translation::{LocalizedValue, TranslationError, TranslationMap};
