//! Generation pipeline: specification -> template data -> files on disk.
//!
//! [`builder`] flattens the specification into the records in [`context`],
//! [`orchestrator`] renders them through the template registry, and
//! [`output`] keeps every write inside the mode-scoped output root.

pub mod aggregate;
pub mod builder;
pub mod context;
pub mod orchestrator;
pub mod output;

pub use aggregate::{AggregateEmitter, PlannedFile, SkipAggregates, SplitAggregates, emitter_for};
pub use builder::ContextBuilder;
pub use context::*;
pub use orchestrator::*;
pub use output::{OutputRoot, check_segment};
