//! Template-data records.
//!
//! Flat, already-normalized structures handed to the templates. Templates never
//! see the nested specification shape; every name they print has been run
//! through the naming helpers and every type through the type mapper.

use serde::Serialize;

/// Project-wide data for the root files (go.mod, main.go, Makefile, config).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectContext {
    pub name: String,
    pub module_path: String,
    pub version: String,
    pub api_host: String,
    pub api_port: u16,
    pub web_host: String,
    pub web_port: u16,
    pub database_engine: String,
    pub database_dsn: String,
    /// Feature package names in generation order
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationContext {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldContext {
    /// Exported Go field name
    pub name: String,
    /// Name as written in the specification
    pub source_name: String,
    pub go_type: String,
    /// Specification type tag
    pub type_tag: String,
    /// snake_case JSON / column tag
    pub wire_tag: String,
    pub is_id: bool,
    pub validations: Vec<ValidationContext>,
}

/// Data for the model template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelContext {
    pub package_name: String,
    pub model_name: String,
    pub file_slug: String,
    pub audit: bool,
    pub fields: Vec<FieldContext>,
    pub has_validations: bool,
    /// Validations need the `fmt` package
    pub needs_formatting_support: bool,
    /// Validations need the `strconv` package
    pub needs_numeric_parsing_support: bool,
    pub needs_uuid: bool,
    pub needs_time: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteContext {
    pub method: String,
    pub path: String,
    pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    pub route: String,
    pub uses: Vec<String>,
}

/// Data for the feature-level service interface and README.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContext {
    pub package_name: String,
    pub kind: String,
    pub module_path: String,
    pub models: Vec<String>,
    pub service_methods: Vec<String>,
    pub routes: Vec<RouteContext>,
    pub pages: Vec<PageContext>,
    pub repo_backends: Vec<String>,
    pub auth_enabled: bool,
}

/// Data for the handler template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerContext {
    pub package_name: String,
    pub model_name: String,
    pub model_plural: String,
    pub model_lower: String,
    pub model_plural_lower: String,
    pub auth_enabled: bool,
    pub audit: bool,
    pub module_path: String,
    /// Nested under an aggregate root rather than mounted top-level
    pub is_child_collection: bool,
    /// Exported aggregate root name when `is_child_collection`
    pub parent_name: Option<String>,
    /// Lowercase plural of `parent_name`, the parent's route segment
    pub parent_plural_lower: Option<String>,
    pub routes: Vec<RouteContext>,
}

/// Data for the repository interface and backend templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryContext {
    pub package_name: String,
    pub model_name: String,
    pub model_plural: String,
    /// SQL table / Mongo collection name
    pub table_name: String,
    pub backend: String,
    pub module_path: String,
    pub audit: bool,
    pub fields: Vec<FieldContext>,
    /// Field tagged `id`; repositories without one only create and list
    pub id_field: Option<FieldContext>,
    /// Column names in storage order, audit columns last
    pub columns: Vec<String>,
    pub needs_uuid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildContext {
    /// Exported collection name
    pub name: String,
    pub wire_tag: String,
    pub file_slug: String,
    /// Exported name of the referenced model
    pub item_model: String,
    pub item_plural: String,
    pub audit: bool,
}

/// Data for the aggregate root template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateContext {
    pub package_name: String,
    pub root_name: String,
    pub file_slug: String,
    pub audit: bool,
    pub fields: Vec<FieldContext>,
    /// Exported name of the optimistic-locking field
    pub version_field: Option<String>,
    pub version_tag: Option<String>,
    pub children: Vec<ChildContext>,
    pub needs_uuid: bool,
    pub needs_time: bool,
}

/// Data for the child collection template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildCollectionContext {
    pub package_name: String,
    pub root_name: String,
    pub collection: ChildContext,
    pub handler: HandlerContext,
}
