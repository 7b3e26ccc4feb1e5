//! Output safety boundary.
//!
//! Every file and directory the generator touches is addressed relative to a
//! single mode-scoped root (`<base>/<mode>`). [`OutputRoot::resolve`] refuses
//! absolute paths and parent-directory hops, so nothing outside that root can
//! be created or overwritten.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::config::Mode;
use crate::core::error::{Error, Result};

/// Check that a specification name can be used as exactly one path segment.
pub fn check_segment(name: &str) -> Result<()> {
    let unsafe_reason = if name.trim().is_empty() {
        Some("empty name")
    } else if name == "." || name == ".." {
        Some("relative directory name")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if name.contains('\0') {
        Some("contains a NUL byte")
    } else {
        None
    };

    match unsafe_reason {
        Some(reason) => Err(Error::unsafe_path(format!("'{name}' ({reason})"))),
        None => Ok(()),
    }
}

/// Root directory all generated output is confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoot {
    root: PathBuf,
}

impl OutputRoot {
    /// `<base>/<mode>`
    pub fn new(base: impl AsRef<Path>, mode: Mode) -> Self {
        Self {
            root: base.as_ref().join(mode.as_str()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Join a relative path onto the root, rejecting anything that could
    /// escape it.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let text = segment.to_string_lossy();
                    if text.contains('\\') {
                        return Err(Error::unsafe_path(format!(
                            "{} (backslash in segment)",
                            relative.display()
                        )));
                    }
                    resolved.push(segment);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::unsafe_path(format!(
                        "{} escapes {}",
                        relative.display(),
                        self.root.display()
                    )));
                }
            }
        }

        if depth == 0 {
            return Err(Error::unsafe_path(format!(
                "'{}' does not name anything under {}",
                relative.display(),
                self.root.display()
            )));
        }
        Ok(resolved)
    }

    /// Create the root itself.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Create a directory under the root (no-op when it exists).
    pub fn ensure_dir(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.resolve(relative)?;
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Write a file under the root, creating parent directories and replacing
    /// any previous content.
    pub fn write(&self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        debug!(path = %path.display(), "Wrote file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_root_is_mode_scoped() {
        let root = OutputRoot::new("out", Mode::Dev);
        assert_eq!(root.path(), Path::new("out/dev"));
        let root = OutputRoot::new("out", Mode::Prod);
        assert_eq!(root.path(), Path::new("out/prod"));
    }

    #[test]
    fn test_resolve_keeps_paths_under_root() {
        let root = OutputRoot::new("out", Mode::Prod);
        let path = root.resolve("internal/feat/billing/invoice.go").unwrap();
        assert_eq!(path, Path::new("out/prod/internal/feat/billing/invoice.go"));
        assert!(path.starts_with(root.path()));

        let path = root.resolve("./go.mod").unwrap();
        assert_eq!(path, Path::new("out/prod/go.mod"));
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = OutputRoot::new("out", Mode::Prod);
        for bad in [
            "../main.go",
            "internal/../../x",
            "/etc/passwd",
            "",
            ".",
            "a\\..\\b",
        ] {
            let err = root.resolve(bad).unwrap_err();
            assert!(matches!(err, Error::UnsafePath(_)), "{bad} accepted");
        }
    }

    #[test]
    fn test_check_segment() {
        assert!(check_segment("billing").is_ok());
        assert!(check_segment("Invoice").is_ok());
        assert!(check_segment("with space").is_ok());
        for bad in ["", "  ", ".", "..", "a/b", "a\\b", "../x", "nul\0byte"] {
            assert!(check_segment(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let temp = tempdir().unwrap();
        let root = OutputRoot::new(temp.path(), Mode::Dev);
        root.ensure_root().unwrap();

        let path = root.write("internal/feat/a/file.txt", "one").unwrap();
        assert!(path.starts_with(temp.path().join("dev")));
        root.write("internal/feat/a/file.txt", "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = tempdir().unwrap();
        let root = OutputRoot::new(temp.path(), Mode::Prod);
        let first = root.ensure_dir("assets/templates").unwrap();
        let second = root.ensure_dir("assets/templates").unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn test_failed_resolve_writes_nothing() {
        let temp = tempdir().unwrap();
        let root = OutputRoot::new(temp.path().join("out"), Mode::Prod);
        assert!(root.write("../escaped.txt", "x").is_err());
        assert!(!temp.path().join("out/escaped.txt").exists());
        assert!(!temp.path().join("out").exists());
    }
}
