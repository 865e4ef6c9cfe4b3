//! Value objects - Immutable objects defined by their attributes

mod level;
mod names;
mod path;

// Validated names and codes
pub use names::{AttributeName, DisplayName, LevelKind, Locale};

// Materialized path encoding
pub use path::MaterializedPath;

// Bulk resolution targets
pub use level::{ShortfallPolicy, TargetLevel};
