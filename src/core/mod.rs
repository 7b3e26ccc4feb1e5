//! Core types: specification model, naming and type rules, configuration,
//! errors and the template registry.

pub mod config;
pub mod error;
pub mod naming;
pub mod spec;
pub mod templates;
pub mod types;

pub use error::Error;
