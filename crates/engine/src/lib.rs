//! Bridge Engine library.
//!
//! Location hierarchy storage with materialized paths, bulk ancestor
//! resolution, and inline multi-locale translations.
//!
//! ## Structure
//!
//! - `entities/` - Stores wrapping domain operations (hierarchy, translations)
//! - `use_cases/` - Orchestration across stores (bulk resolution, bindings)
//! - `infrastructure/` - Ports, the in-memory backend, settings, seed import
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
