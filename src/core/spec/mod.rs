//! The aquamarine project specification.
//!
//! A specification is read once per invocation from `aquamarine.yaml` and stays
//! read-only for the whole generation run. Every mapping deserializes into a
//! `BTreeMap`, so features, models and fields are always walked in
//! lexicographic order and repeated runs produce identical output.
//!
//! ```yaml
//! version: "0.1"
//! project:
//!   name: shop
//!   module: github.com/acme/shop
//! runtime:
//!   http:
//!     web: { host: localhost, port: 8080 }
//!   database:
//!     engine: sqlite
//! feats:
//!   billing:
//!     kind: feature
//!     models:
//!       Invoice:
//!         fields:
//!           total: float64
//!           paidAt: { type: text }
//! ```

mod validate;

pub use validate::ValidationOptions;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::Result;

/// Default specification file name, looked up in the working directory.
pub const DEFAULT_SPEC_FILE: &str = "aquamarine.yaml";

/// Database engine used when the specification leaves it empty.
pub const DEFAULT_DATABASE_ENGINE: &str = "sqlite";

/// Default API port for the generated application.
pub const DEFAULT_API_PORT: u16 = 8081;

/// Default web port for the generated application.
pub const DEFAULT_WEB_PORT: u16 = 8080;

/// Root of the specification tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub runtime: Runtime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feats: BTreeMap<String, Feature>,
}

/// Project identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    /// Go module path of the generated application. Required.
    #[serde(default)]
    pub module: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Runtime {
    #[serde(default)]
    pub http: HttpRuntime,
    #[serde(default)]
    pub database: Database,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpRuntime {
    #[serde(default)]
    pub api: Endpoint,
    #[serde(default)]
    pub web: Endpoint,
}

/// Listening address of one of the generated servers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub dsn: String,
}

/// Role of a feature within the generated application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Domain slice with models, services and API routes
    #[default]
    Feature,
    /// Server-rendered pages
    Web,
    /// Shared support code
    Support,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Web => "web",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feature" => Ok(Self::Feature),
            "web" => Ok(Self::Web),
            "support" => Ok(Self::Support),
            _ => Err(format!("Unknown feature kind: {s}")),
        }
    }
}

/// A named vertical slice of the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Informational; the mapping key is the canonical feature name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: FeatureKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: BTreeMap<String, Model>,
    #[serde(default)]
    pub service: Service,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub web: Web,
    /// Repository backends to scaffold, e.g. `sqlite`, `mongo`.
    #[serde(default, alias = "repoImpl", deserialize_with = "null_as_default")]
    pub repo_impl: BTreeSet<String>,
    #[serde(default)]
    pub auth: Option<Auth>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregates: BTreeMap<String, Aggregate>,
}

impl Feature {
    /// Whether authentication is enabled for the feature's handlers.
    pub fn auth_enabled(&self) -> bool {
        self.auth.as_ref().is_some_and(|auth| auth.enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Api {
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Web {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub method: String,
    pub path: String,
    pub handler: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub route: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub enabled: bool,
}

/// A data entity generated into one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, Field>,
    #[serde(default)]
    pub options: Option<ModelOptions>,
}

impl Model {
    pub fn audit(&self) -> bool {
        self.options.as_ref().is_some_and(|options| options.audit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOptions {
    #[serde(default)]
    pub audit: bool,
}

/// A typed model field.
///
/// Accepts either the full form `{ type: text, validations: [...] }` or the
/// bare type tag shorthand `text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: String,
    pub validations: Vec<Validation>,
}

impl Field {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            validations: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Tag(String),
    Full {
        #[serde(rename = "type")]
        field_type: String,
        #[serde(default, deserialize_with = "null_as_default")]
        validations: Vec<Validation>,
    },
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match FieldRepr::deserialize(deserializer)? {
            FieldRepr::Tag(field_type) => Field::new(field_type),
            FieldRepr::Full {
                field_type,
                validations,
            } => Field {
                field_type,
                validations,
            },
        })
    }
}

/// A validation rule attached to a field, copied verbatim into template data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub name: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: Option<String>,
}

/// A model acting as a consistency boundary over child collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, Field>,
    #[serde(default, alias = "versionField")]
    pub version_field: Option<String>,
    #[serde(default)]
    pub audit: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: BTreeMap<String, ChildCollection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildCollection {
    /// Name of a model declared in the same feature.
    pub of: String,
    #[serde(default)]
    pub audit: bool,
}

impl Specification {
    /// Parse a specification from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a specification file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading specification");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Database engine, defaulting to sqlite.
    pub fn database_engine(&self) -> &str {
        let engine = self.runtime.database.engine.trim();
        if engine.is_empty() {
            DEFAULT_DATABASE_ENGINE
        } else {
            engine
        }
    }

    pub fn api_port(&self) -> u16 {
        self.runtime.http.api.port.unwrap_or(DEFAULT_API_PORT)
    }

    pub fn web_port(&self) -> u16 {
        self.runtime.http.web.port.unwrap_or(DEFAULT_WEB_PORT)
    }
}

/// Treats an explicit YAML `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any YAML scalar and keeps its textual form.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "validation value must be a scalar, got {other:?}"
        ))),
    }
}
