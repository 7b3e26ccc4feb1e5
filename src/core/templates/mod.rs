//! Template system for code generation.
//!
//! The generator renders a fixed set of named templates ([`TemplateKind`]).
//! Templates are held in an immutable [`TemplateRegistry`] that is created once
//! per run from the embedded set, a custom directory, or in-memory sources.

pub mod dir;
pub mod embedded;
pub mod kind;
pub mod registry;

pub use dir::*;
pub use embedded::*;
pub use kind::*;
pub use registry::*;
