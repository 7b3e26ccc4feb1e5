//! Aggregate emission strategies.
//!
//! Aggregates are always validated; what gets written for them is up to the
//! [`AggregateEmitter`] the generator is configured with. Emitters only plan
//! files; rendering and writing stay with the generator so every path still
//! goes through the output root.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::config::AggregateMode;
use crate::core::error::Result;
use crate::core::templates::TemplateKind;

use super::context::{AggregateContext, ChildCollectionContext};

/// One file an emitter wants rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub template: TemplateKind,
    /// Path relative to the output root
    pub path: PathBuf,
    /// Label carried into render errors
    pub target: String,
    pub data: serde_json::Value,
}

impl PlannedFile {
    pub fn new<T: Serialize>(
        template: TemplateKind,
        path: impl Into<PathBuf>,
        target: impl Into<String>,
        data: &T,
    ) -> Result<Self> {
        Ok(Self {
            template,
            path: path.into(),
            target: target.into(),
            data: serde_json::to_value(data)?,
        })
    }
}

/// Decides which files an aggregate produces.
pub trait AggregateEmitter: Send + Sync {
    fn name(&self) -> &'static str;

    /// `feature_dir` is the feature directory relative to the output root.
    fn plan(
        &self,
        feature_dir: &str,
        aggregate: &AggregateContext,
        children: &[ChildCollectionContext],
    ) -> Result<Vec<PlannedFile>>;
}

/// Emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipAggregates;

impl AggregateEmitter for SkipAggregates {
    fn name(&self) -> &'static str {
        "skip"
    }

    fn plan(
        &self,
        _feature_dir: &str,
        _aggregate: &AggregateContext,
        _children: &[ChildCollectionContext],
    ) -> Result<Vec<PlannedFile>> {
        Ok(Vec::new())
    }
}

/// Root file plus one file per child collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitAggregates;

impl AggregateEmitter for SplitAggregates {
    fn name(&self) -> &'static str {
        "split"
    }

    fn plan(
        &self,
        feature_dir: &str,
        aggregate: &AggregateContext,
        children: &[ChildCollectionContext],
    ) -> Result<Vec<PlannedFile>> {
        let mut files = Vec::with_capacity(children.len() + 1);
        files.push(PlannedFile::new(
            TemplateKind::AggregateRoot,
            format!("{feature_dir}/{}_aggregate.go", aggregate.file_slug),
            format!(
                "aggregate {}/{}",
                aggregate.package_name, aggregate.root_name
            ),
            aggregate,
        )?);

        for child in children {
            files.push(PlannedFile::new(
                TemplateKind::ChildCollection,
                format!(
                    "{feature_dir}/{}_{}.go",
                    aggregate.file_slug, child.collection.file_slug
                ),
                format!(
                    "child collection {}/{}.{}",
                    child.package_name, child.root_name, child.collection.name
                ),
                child,
            )?);
        }
        Ok(files)
    }
}

/// Built-in emitter for a configured mode.
pub fn emitter_for(mode: AggregateMode) -> Box<dyn AggregateEmitter> {
    match mode {
        AggregateMode::Skip => Box::new(SkipAggregates),
        AggregateMode::Split => Box::new(SplitAggregates),
    }
}
