//! The fixed set of named templates the generator renders.
//!
//! Each [`TemplateKind`] maps to one template file name. Whether the template
//! comes from the embedded set, a custom directory or an in-memory registry is
//! decided by [`super::TemplateRegistry`]; the orchestrator only ever asks for a
//! kind.
//!
//! # Examples
//!
//! ```
//! use aquamarine::core::templates::TemplateKind;
//! use std::str::FromStr;
//!
//! let kind = TemplateKind::from_str("model").unwrap();
//! assert_eq!(kind, TemplateKind::Model);
//! assert_eq!(kind.file_name(), "model.go.tera");
//! assert_eq!(kind.to_string(), "model");
//! ```

use std::fmt;
use std::str::FromStr;

/// Named render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKind {
    /// Model struct with optional validation method
    Model,
    /// Repository interface per model
    RepoInterface,
    /// Feature service interface
    ServiceInterface,
    /// SQLite repository implementation
    SqliteRepo,
    /// SQLite query set
    SqliteQueries,
    /// MongoDB repository implementation
    MongoRepo,
    /// HTTP handler per model
    Handler,
    /// Validator per model
    Validator,
    /// Application entry point
    Main,
    /// Go config loader
    ConfigSource,
    /// YAML config file
    ConfigDeclaration,
    /// Auxiliary request parameter helpers
    XParams,
    /// Makefile
    BuildInstructions,
    /// Aggregate root
    AggregateRoot,
    /// Child collection of an aggregate
    ChildCollection,
    /// go.mod
    Manifest,
}

impl TemplateKind {
    /// Returns the template identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::RepoInterface => "repo_interface",
            Self::ServiceInterface => "service_interface",
            Self::SqliteRepo => "repo_sqlite",
            Self::SqliteQueries => "queries_sqlite",
            Self::MongoRepo => "repo_mongo",
            Self::Handler => "handler",
            Self::Validator => "validator",
            Self::Main => "main",
            Self::ConfigSource => "config_source",
            Self::ConfigDeclaration => "config_declaration",
            Self::XParams => "xparams",
            Self::BuildInstructions => "makefile",
            Self::AggregateRoot => "aggregate_root",
            Self::ChildCollection => "child_collection",
            Self::Manifest => "go_mod",
        }
    }

    /// Template file name inside a template directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Model => "model.go.tera",
            Self::RepoInterface => "repo_interface.go.tera",
            Self::ServiceInterface => "service_interface.go.tera",
            Self::SqliteRepo => "repo_sqlite.go.tera",
            Self::SqliteQueries => "queries_sqlite.sql.tera",
            Self::MongoRepo => "repo_mongo.go.tera",
            Self::Handler => "handler.go.tera",
            Self::Validator => "validator.go.tera",
            Self::Main => "main.go.tera",
            Self::ConfigSource => "config.go.tera",
            Self::ConfigDeclaration => "config.yaml.tera",
            Self::XParams => "xparams.go.tera",
            Self::BuildInstructions => "Makefile.tera",
            Self::AggregateRoot => "aggregate_root.go.tera",
            Self::ChildCollection => "child_collection.go.tera",
            Self::Manifest => "go.mod.tera",
        }
    }

    /// Returns an iterator over all template kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateKind::*;
        [
            Model,
            RepoInterface,
            ServiceInterface,
            SqliteRepo,
            SqliteQueries,
            MongoRepo,
            Handler,
            Validator,
            Main,
            ConfigSource,
            ConfigDeclaration,
            XParams,
            BuildInstructions,
            AggregateRoot,
            ChildCollection,
            Manifest,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::all()
            .find(|kind| kind.as_str() == lowered || kind.file_name() == s)
            .ok_or_else(|| format!("Unknown template: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_kinds_have_distinct_names() {
        let names: HashSet<_> = TemplateKind::all().map(|k| k.as_str()).collect();
        let files: HashSet<_> = TemplateKind::all().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), 16);
        assert_eq!(files.len(), 16);
    }

    #[test]
    fn test_from_str_accepts_name_and_file_name() {
        assert_eq!(
            "repo_sqlite".parse::<TemplateKind>().unwrap(),
            TemplateKind::SqliteRepo
        );
        assert_eq!(
            "Makefile.tera".parse::<TemplateKind>().unwrap(),
            TemplateKind::BuildInstructions
        );
        assert!("unknown".parse::<TemplateKind>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for kind in TemplateKind::all() {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
