//! Aquamarine library
//!
//! Turns a declarative `aquamarine.yaml` project description into a
//! scaffolded Go application tree under `out/<mode>/`.
#![deny(unsafe_code)]

pub mod core;
pub mod generation;

pub use crate::core::config::{AggregateMode, GeneratorConfig, Mode};
pub use crate::core::error::{Error, Result};
pub use crate::generation::{GenerationReport, Generator, GeneratorOptions, generate};
