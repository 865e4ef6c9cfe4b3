//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Node storage (could swap the in-memory index -> Postgres `ltree`)
//! - Translation storage (could swap in-memory -> a JSONB column)
//! - Clock (for testing)
//!
//! A backend only has to offer two primitives: an atomic read-modify-write of
//! one record (or one subtree swap) and a prefix-range scan over paths.

mod error;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;
