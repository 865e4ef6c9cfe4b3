//! In-memory storage backend.
//!
//! Each repository keeps its records and secondary index behind one
//! `tokio::sync::RwLock`, so a write (including a whole subtree swap) is
//! visible to readers all at once.

mod node_repo;
mod translation_repo;

pub use node_repo::InMemoryNodeRepo;
pub use translation_repo::InMemoryTranslationRepo;
