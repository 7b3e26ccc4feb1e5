//! Error handling for the aquamarine generator.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use aquamarine::core::error::{Error, Result};
//!
//! fn might_fail(module: &str) -> Result<()> {
//!     if module.is_empty() {
//!         return Err(Error::config("project.module is required"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_fail("").is_err());
//! ```

use thiserror::Error;

/// Result type for aquamarine generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for aquamarine generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Missing or invalid specification / generator configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template registry error (unknown template, unreadable template set)
    #[error("Template error: {0}")]
    Template(String),

    /// A template failed to render for a specific generation target
    #[error("Failed to render template '{template}' for {target}: {message}")]
    Render {
        template: String,
        target: String,
        message: String,
    },

    /// A child collection points at a model the feature does not declare
    #[error(
        "Unknown model reference '{model}' in feature '{feature}', aggregate '{aggregate}', child '{child}'"
    )]
    UnknownModelReference {
        feature: String,
        aggregate: String,
        child: String,
        model: String,
    },

    /// Strict mode rejected a field type tag with no mapping
    #[error("Unmapped field type '{tag}' for field '{field}' of '{owner}' in feature '{feature}'")]
    UnmappedType {
        feature: String,
        owner: String,
        field: String,
        tag: String,
    },

    /// A computed path would leave the output root
    #[error("Unsafe output path: {0}")]
    UnsafePath(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Create a new unsafe path error
    pub fn unsafe_path<S: Into<String>>(msg: S) -> Self {
        Self::UnsafePath(msg.into())
    }
}
