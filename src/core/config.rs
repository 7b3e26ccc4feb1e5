//! Generator run configuration.
//!
//! Built once per invocation from CLI flags and handed to
//! [`crate::generation::generate`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::spec::{DEFAULT_SPEC_FILE, ValidationOptions};

/// Default directory under which mode-scoped output roots are created.
pub const DEFAULT_OUTPUT_BASE: &str = "out";

/// Output root selector. Has no effect on generation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    Dev,
    #[default]
    Prod,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }

    /// `dev` when the flag is set, `prod` otherwise.
    pub fn from_dev_flag(dev: bool) -> Self {
        if dev { Self::Dev } else { Self::Prod }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err(format!("Unknown mode: {s}")),
        }
    }
}

/// How aggregates declared in the specification are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AggregateMode {
    /// Validate aggregates but emit nothing for them
    #[default]
    Skip,
    /// One aggregate root file plus one file per child collection
    Split,
}

impl AggregateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for AggregateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AggregateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "split" => Ok(Self::Split),
            _ => Err(format!("Unknown aggregate mode: {s}")),
        }
    }
}

/// Everything a generation run needs besides the specification itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Path to the specification file
    pub spec_path: PathBuf,
    /// Directory holding the mode-scoped output roots
    pub output_base: PathBuf,
    pub mode: Mode,
    /// Custom template directory; embedded templates are used when unset
    pub template_dir: Option<PathBuf>,
    /// Reject unmapped field types
    pub strict_types: bool,
    pub aggregates: AggregateMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from(DEFAULT_SPEC_FILE),
            output_base: PathBuf::from(DEFAULT_OUTPUT_BASE),
            mode: Mode::default(),
            template_dir: None,
            strict_types: false,
            aggregates: AggregateMode::default(),
        }
    }
}

impl GeneratorConfig {
    /// `<output_base>/<mode>`
    pub fn output_root(&self) -> PathBuf {
        self.output_base.join(self.mode.as_str())
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            strict_types: self.strict_types,
        }
    }
}
