//! Up-front validation of a parsed specification.
//!
//! Everything here runs before the first directory is created, so a rejected
//! specification never leaves partial output behind.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Feature, Field, Specification};
use crate::core::error::{Error, Result};
use crate::core::naming::{to_file_slug, to_wire_tag};
use crate::core::types::TypeMapper;
use crate::generation::output::check_segment;

/// Knobs for [`Specification::validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject field type tags that have no Go mapping.
    pub strict_types: bool,
}

impl ValidationOptions {
    pub fn strict() -> Self {
        Self { strict_types: true }
    }

    pub fn type_mapper(&self) -> TypeMapper {
        if self.strict_types {
            TypeMapper::strict()
        } else {
            TypeMapper::permissive()
        }
    }
}

impl Specification {
    /// Check required fields, name safety, child references, generated file
    /// and wire tag collisions, and (optionally) field types.
    pub fn validate(&self, options: &ValidationOptions) -> Result<()> {
        if self.project.module.trim().is_empty() {
            return Err(Error::config("project.module is required"));
        }

        let mapper = options.type_mapper();
        for (feat_name, feat) in &self.feats {
            check_segment(feat_name)?;
            for (model_name, model) in &feat.models {
                check_segment(model_name)?;
                check_field_types(&mapper, feat_name, model_name, &model.fields)?;
            }
            for (aggregate_name, aggregate) in &feat.aggregates {
                check_segment(aggregate_name)?;
                check_field_types(&mapper, feat_name, aggregate_name, &aggregate.fields)?;
                for child_name in aggregate.children.keys() {
                    check_segment(child_name)?;
                }
            }
            check_child_references(feat_name, feat)?;
            check_file_collisions(feat_name, feat)?;
            check_wire_tag_collisions(feat_name, feat)?;
        }

        debug!(features = self.feats.len(), "Specification validated");
        Ok(())
    }
}

fn check_field_types<'a>(
    mapper: &TypeMapper,
    feature: &str,
    owner: &str,
    fields: impl IntoIterator<Item = (&'a String, &'a Field)>,
) -> Result<()> {
    for (field_name, field) in fields {
        if mapper.map(&field.field_type).is_none() {
            return Err(Error::UnmappedType {
                feature: feature.to_string(),
                owner: owner.to_string(),
                field: field_name.clone(),
                tag: field.field_type.clone(),
            });
        }
    }
    Ok(())
}

fn check_child_references(feat_name: &str, feat: &Feature) -> Result<()> {
    for (aggregate_name, aggregate) in &feat.aggregates {
        for (child_name, child) in &aggregate.children {
            if !feat.models.contains_key(&child.of) {
                return Err(Error::UnknownModelReference {
                    feature: feat_name.to_string(),
                    aggregate: aggregate_name.clone(),
                    child: child_name.clone(),
                    model: child.of.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Suffixes of the per-model files written next to `<model>.go`.
const MODEL_FILE_SUFFIXES: [&str; 6] = [
    "",
    "_repo",
    "_handler",
    "_validator",
    "_sqlite_repo",
    "_mongo_repo",
];

/// Columns added to audited owners.
const AUDIT_TAGS: [&str; 2] = ["created_at", "updated_at"];

/// Records `key` for `owner`, failing when another owner already claimed it.
fn claim(
    claimed: &mut BTreeMap<String, String>,
    key: String,
    owner: String,
    describe: impl FnOnce(&str, &str, &str) -> String,
) -> Result<()> {
    if let Some(previous) = claimed.get(&key) {
        return Err(Error::config(describe(previous, &owner, &key)));
    }
    claimed.insert(key, owner);
    Ok(())
}

/// Every Go file a feature can produce must come from exactly one name.
fn check_file_collisions(feat_name: &str, feat: &Feature) -> Result<()> {
    let mut claimed = BTreeMap::new();
    let describe = |a: &str, b: &str, stem: &str| {
        format!("feature '{feat_name}': {a} and {b} would both be written to {stem}.go")
    };

    claim(&mut claimed, "service".to_string(), "the service file".to_string(), describe)?;
    for model_name in feat.models.keys() {
        let slug = to_file_slug(model_name);
        for suffix in MODEL_FILE_SUFFIXES {
            claim(
                &mut claimed,
                format!("{slug}{suffix}"),
                format!("model '{model_name}'"),
                describe,
            )?;
        }
    }
    for (aggregate_name, aggregate) in &feat.aggregates {
        let slug = to_file_slug(aggregate_name);
        claim(
            &mut claimed,
            format!("{slug}_aggregate"),
            format!("aggregate '{aggregate_name}'"),
            describe,
        )?;
        for child_name in aggregate.children.keys() {
            claim(
                &mut claimed,
                format!("{slug}_{}", to_file_slug(child_name)),
                format!("child '{aggregate_name}.{child_name}'"),
                describe,
            )?;
        }
    }
    Ok(())
}

/// Field, version, child and audit tags must be unique within one owner.
fn check_wire_tag_collisions(feat_name: &str, feat: &Feature) -> Result<()> {
    let mut owners: Vec<(&String, bool, Vec<(&str, &String)>)> = Vec::new();
    for (model_name, model) in &feat.models {
        let names = model.fields.keys().map(|name| ("field", name)).collect();
        owners.push((model_name, model.audit(), names));
    }
    for (aggregate_name, aggregate) in &feat.aggregates {
        let names = aggregate
            .fields
            .keys()
            .map(|name| ("field", name))
            .chain(aggregate.version_field.iter().map(|name| ("version field", name)))
            .chain(aggregate.children.keys().map(|name| ("child", name)))
            .collect();
        owners.push((aggregate_name, aggregate.audit, names));
    }

    for (owner, audit, names) in owners {
        let mut claimed = BTreeMap::new();
        let describe = |a: &str, b: &str, tag: &str| {
            format!("feature '{feat_name}', '{owner}': {a} and {b} share the wire tag '{tag}'")
        };
        if audit {
            for tag in AUDIT_TAGS {
                claim(&mut claimed, tag.to_string(), format!("audit column '{tag}'"), describe)?;
            }
        }
        for (role, name) in names {
            claim(&mut claimed, to_wire_tag(name), format!("{role} '{name}'"), describe)?;
        }
    }
    Ok(())
}
