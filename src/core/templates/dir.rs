//! Resolution of a custom template directory.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable naming a custom template directory.
pub const TEMPLATE_DIR_ENV: &str = "AQUAMARINE_TEMPLATE_DIR";

/// Trait for reading template configuration, allowing dependency injection for testing
pub trait TemplateConfigReader {
    fn get_template_dir(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvTemplateConfigReader;

impl TemplateConfigReader for EnvTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        std::env::var(TEMPLATE_DIR_ENV).ok()
    }
}

/// Mock implementation for testing with controlled values
#[cfg(test)]
pub struct MockTemplateConfigReader(Option<String>);

#[cfg(test)]
impl MockTemplateConfigReader {
    pub fn new(template_dir: Option<String>) -> Self {
        Self(template_dir)
    }
}

#[cfg(test)]
impl TemplateConfigReader for MockTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Pick the template directory: explicit flag first, then the environment.
///
/// `None` means the embedded templates should be used.
pub fn resolve_template_dir(
    explicit: Option<&Path>,
    reader: &dyn TemplateConfigReader,
) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        debug!("Using template directory from flag: {}", dir.display());
        return Some(dir.to_path_buf());
    }

    let from_env = reader
        .get_template_dir()
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);
    if let Some(dir) = &from_env {
        debug!("Using template directory from {}: {}", TEMPLATE_DIR_ENV, dir.display());
    }
    from_env
}
