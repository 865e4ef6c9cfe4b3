//! Domain entities - Core business objects with identity

mod node;
mod point_of_interest;
mod translated_entity;

pub use node::Node;
pub use point_of_interest::PointOfInterest;
pub use translated_entity::{TranslatedEntity, TranslationMutation, Translations};
