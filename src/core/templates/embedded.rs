//! Templates embedded in the binary at compile time.
//!
//! The `templates/` directory is included with `rust-embed`, so a plain
//! `cargo install` is enough to generate projects without shipping template
//! files separately.

use rust_embed::RustEmbed;

use super::TemplateKind;
use crate::core::error::{Error, Result};

/// Container for all templates embedded at compile time.
#[derive(RustEmbed)]
#[folder = "templates/"]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    /// Source text of the embedded template for `kind`.
    pub fn source(kind: TemplateKind) -> Result<String> {
        let file = Self::get(kind.file_name()).ok_or_else(|| {
            Error::template(format!("Embedded template missing: {}", kind.file_name()))
        })?;
        String::from_utf8(file.data.into_owned()).map_err(|e| {
            Error::template(format!(
                "Embedded template {} is not valid UTF-8: {e}",
                kind.file_name()
            ))
        })
    }
}
