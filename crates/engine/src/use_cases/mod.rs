//! Use cases - User story orchestration.
//!
//! Use cases combine entity modules to answer questions that span more than
//! one record: bulk ancestor lookups and leaf bindings.

pub mod bind_point_of_interest;
pub mod resolve_ancestors;

pub use bind_point_of_interest::PointOfInterestBinder;
pub use resolve_ancestors::{AncestorResolution, QueryPlanner};
