//! Immutable registry of named templates backed by Tera.
//!
//! The registry is built once per invocation and passed into the generator,
//! which keeps the pipeline testable without template files on disk: tests
//! inject templates with [`TemplateRegistry::from_raw`].
//!
//! Sources, in order of preference:
//! 1. a custom directory (flag or `AQUAMARINE_TEMPLATE_DIR`), where each
//!    template file present overrides the embedded one
//! 2. the templates embedded in the binary

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, error, info};

use super::dir::{TemplateConfigReader, resolve_template_dir};
use super::{EmbeddedTemplates, TemplateKind};
use crate::core::error::{Error, Result};

/// Where the registry's templates came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Embedded,
    Filesystem(PathBuf),
    InMemory,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded"),
            Self::Filesystem(path) => write!(f, "{}", path.display()),
            Self::InMemory => write!(f, "in-memory"),
        }
    }
}

/// Named template set used by the generator
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    tera: Arc<Tera>,
    source: TemplateSource,
}

impl TemplateRegistry {
    /// Registry with exactly the given templates.
    pub fn from_raw<'a, I>(templates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TemplateKind, &'a str)>,
    {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            templates
                .into_iter()
                .map(|(kind, source)| (kind.file_name(), source)),
        )?;
        Ok(Self {
            tera: Arc::new(tera),
            source: TemplateSource::InMemory,
        })
    }

    /// Registry of the templates embedded in the binary.
    pub fn from_embedded() -> Result<Self> {
        let sources = TemplateKind::all()
            .map(|kind| Ok((kind.file_name(), EmbeddedTemplates::source(kind)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)?;
        Ok(Self {
            tera: Arc::new(tera),
            source: TemplateSource::Embedded,
        })
    }

    /// Registry from a template directory; files it lacks fall back to the
    /// embedded templates.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            error!("Template directory not found: {}", dir.display());
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Template directory not found: {}", dir.display()),
            )));
        }

        let mut sources = Vec::new();
        for kind in TemplateKind::all() {
            let path = dir.join(kind.file_name());
            let source = if path.is_file() {
                debug!(template = %kind, path = %path.display(), "Using custom template");
                std::fs::read_to_string(&path)?
            } else {
                EmbeddedTemplates::source(kind)?
            };
            sources.push((kind.file_name(), source));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources).map_err(|e| {
            Error::template(format!(
                "Failed to parse templates in {}: {}",
                dir.display(),
                error_chain(&e)
            ))
        })?;
        Ok(Self {
            tera: Arc::new(tera),
            source: TemplateSource::Filesystem(dir.to_path_buf()),
        })
    }

    /// Build the registry for a run from an explicit directory, the
    /// environment, or the embedded set.
    pub fn resolve(explicit: Option<&Path>, reader: &dyn TemplateConfigReader) -> Result<Self> {
        let registry = match resolve_template_dir(explicit, reader) {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::from_embedded()?,
        };
        info!(source = %registry.source, "Loaded templates");
        Ok(registry)
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn contains(&self, kind: TemplateKind) -> bool {
        self.tera.get_template(kind.file_name()).is_ok()
    }

    /// Render `kind` with `data`; `target` names what is being generated and
    /// is carried into errors.
    pub fn render<T: Serialize>(&self, kind: TemplateKind, target: &str, data: &T) -> Result<String> {
        if !self.contains(kind) {
            return Err(Error::template(format!(
                "Template not found: {} (needed for {target})",
                kind.file_name()
            )));
        }

        let context = Context::from_serialize(data).map_err(|e| Error::Render {
            template: kind.file_name().to_string(),
            target: target.to_string(),
            message: error_chain(&e),
        })?;

        debug!(template = %kind, target, "Rendering template");
        self.tera
            .render(kind.file_name(), &context)
            .map_err(|e| Error::Render {
                template: kind.file_name().to_string(),
                target: target.to_string(),
                message: error_chain(&e),
            })
    }
}

/// Tera puts the useful detail in the source chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_render_in_memory_template() {
        let registry =
            TemplateRegistry::from_raw([(TemplateKind::Model, "type {{ model_name }} struct{}")])
                .unwrap();
        assert_eq!(registry.source(), &TemplateSource::InMemory);
        let out = registry
            .render(TemplateKind::Model, "model a/B", &json!({ "model_name": "Invoice" }))
            .unwrap();
        assert_eq!(out, "type Invoice struct{}");
    }

    #[test]
    fn test_missing_template_is_template_error() {
        let registry = TemplateRegistry::from_raw([(TemplateKind::Model, "x")]).unwrap();
        assert!(!registry.contains(TemplateKind::Handler));
        let err = registry
            .render(TemplateKind::Handler, "handler billing/Invoice", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().contains("handler.go.tera"));
    }

    #[test]
    fn test_render_failure_names_target() {
        let registry =
            TemplateRegistry::from_raw([(TemplateKind::Model, "{{ missing.value }}")]).unwrap();
        let err = registry
            .render(TemplateKind::Model, "model billing/Invoice", &json!({}))
            .unwrap_err();
        match err {
            Error::Render {
                template, target, ..
            } => {
                assert_eq!(template, "model.go.tera");
                assert_eq!(target, "model billing/Invoice");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_embedded_registry_has_every_kind() {
        let registry = TemplateRegistry::from_embedded().unwrap();
        for kind in TemplateKind::all() {
            assert!(registry.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn test_dir_overrides_single_template() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod.tera"), "module {{ module }}\n").unwrap();

        let registry = TemplateRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(
            registry.source(),
            &TemplateSource::Filesystem(dir.path().to_path_buf())
        );
        let out = registry
            .render(TemplateKind::Manifest, "manifest", &json!({ "module": "m" }))
            .unwrap();
        assert_eq!(out, "module m\n");
        assert!(registry.contains(TemplateKind::Model));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let err = TemplateRegistry::from_dir(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
