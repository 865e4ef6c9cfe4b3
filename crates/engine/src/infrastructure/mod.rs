//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod memory;
pub mod ports;
pub mod seed;
pub mod settings;
