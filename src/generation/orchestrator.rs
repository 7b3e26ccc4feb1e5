//! Generation orchestration - sequences one generation run.
//!
//! The run validates the whole specification first, then writes the skeleton,
//! the project root files, every feature and finally the assets note. Any
//! error aborts the run; files written before it stay on disk and a re-run
//! overwrites them.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::{AggregateMode, GeneratorConfig};
use crate::core::error::Result;
use crate::core::spec::{Feature, Specification, ValidationOptions};
use crate::core::templates::{EnvTemplateConfigReader, TemplateKind, TemplateRegistry};

use super::aggregate::{AggregateEmitter, emitter_for};
use super::builder::ContextBuilder;
use super::context::FeatureContext;
use super::output::{OutputRoot, check_segment};

const FEATURE_ROOT: &str = "internal/feat";
const ASSETS_README: &str = "# assets\n\nCentralized assets for the generated app.\n";

/// Backends with repository templates.
const SQLITE_BACKEND: &str = "sqlite";
const MONGO_BACKEND: &str = "mongo";

/// Per-run knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub validation: ValidationOptions,
    pub aggregates: AggregateMode,
}

impl GeneratorOptions {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            validation: config.validation_options(),
            aggregates: config.aggregates,
        }
    }
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_root: PathBuf,
    /// Written files relative to `output_root`, in write order
    pub files: Vec<PathBuf>,
}

/// Generates one output tree from one specification.
pub struct Generator {
    spec: Specification,
    registry: TemplateRegistry,
    output: OutputRoot,
    options: GeneratorOptions,
    emitter: Box<dyn AggregateEmitter>,
}

impl Generator {
    pub fn new(
        spec: Specification,
        registry: TemplateRegistry,
        output: OutputRoot,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            spec,
            registry,
            output,
            emitter: emitter_for(options.aggregates),
            options,
        }
    }

    /// Replace the emitter picked from the configured aggregate mode.
    pub fn with_aggregate_emitter(mut self, emitter: Box<dyn AggregateEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn output_root(&self) -> &OutputRoot {
        &self.output
    }

    /// Execute the generation run. The specification is validated first and
    /// nothing is written when it is rejected.
    pub fn run(&self) -> Result<GenerationReport> {
        // Nothing touches the filesystem until this passes.
        self.spec.validate(&self.options.validation)?;
        let engine = self.spec.database_engine();
        check_segment(engine)?;

        info!(
            project = %self.spec.project.name,
            output = %self.output.path().display(),
            features = self.spec.feats.len(),
            aggregates = self.emitter.name(),
            "Generating project"
        );

        let builder = ContextBuilder::new(&self.spec, self.options.validation.type_mapper());
        let mut run = Run::new(self);

        self.output.ensure_root()?;
        for dir in skeleton_dirs(engine) {
            self.output.ensure_dir(&dir)?;
        }

        let project = builder.project();
        run.render(TemplateKind::Manifest, "go.mod", "project manifest", &project)?;
        run.render(TemplateKind::Main, "main.go", "application entry point", &project)?;
        run.render(TemplateKind::BuildInstructions, "Makefile", "build instructions", &project)?;
        run.render(TemplateKind::ConfigDeclaration, "config.yaml", "config declaration", &project)?;
        run.render(
            TemplateKind::ConfigSource,
            "internal/platform/config.go",
            "config source",
            &project,
        )?;
        run.render(
            TemplateKind::XParams,
            "internal/platform/xparams.go",
            "auxiliary parameters",
            &project,
        )?;

        for (feat_name, feat) in &self.spec.feats {
            self.feature(&mut run, &builder, feat_name, feat)?;
        }

        run.write("assets/README.md", ASSETS_README)?;

        info!(files = run.files.len(), "Generation complete");
        Ok(GenerationReport {
            output_root: self.output.path().to_path_buf(),
            files: run.files,
        })
    }

    fn feature(
        &self,
        run: &mut Run<'_>,
        builder: &ContextBuilder<'_>,
        feat_name: &str,
        feat: &Feature,
    ) -> Result<()> {
        let dir = feature_dir(feat_name);
        debug!(feature = feat_name, "Generating feature");
        self.output.ensure_dir(&dir)?;

        let feature = builder.feature(feat_name, feat);
        run.write(format!("{dir}/README.md"), feature_readme(&feature))?;
        run.render(
            TemplateKind::ServiceInterface,
            format!("{dir}/service.go"),
            format!("service {feat_name}"),
            &feature,
        )?;

        for (model_name, model) in &feat.models {
            let model_ctx = builder.model(feat_name, model_name, model)?;
            let slug = &model_ctx.file_slug;
            let target = format!("{feat_name}/{model_name}");

            run.render(
                TemplateKind::Model,
                format!("{dir}/{slug}.go"),
                format!("model {target}"),
                &model_ctx,
            )?;

            let repo = builder.repository(feat_name, model_name, model, "")?;
            run.render(
                TemplateKind::RepoInterface,
                format!("{dir}/{slug}_repo.go"),
                format!("repository {target}"),
                &repo,
            )?;

            if !feat.api.routes.is_empty() {
                let handler = builder.handler(feat_name, feat, model_name);
                run.render(
                    TemplateKind::Handler,
                    format!("{dir}/{slug}_handler.go"),
                    format!("handler {target}"),
                    &handler,
                )?;
            }

            if model_ctx.has_validations {
                run.render(
                    TemplateKind::Validator,
                    format!("{dir}/{slug}_validator.go"),
                    format!("validator {target}"),
                    &model_ctx,
                )?;
            }

            for backend in &feat.repo_impl {
                let repo = builder.repository(feat_name, model_name, model, backend)?;
                match backend.as_str() {
                    SQLITE_BACKEND => {
                        run.render(
                            TemplateKind::SqliteRepo,
                            format!("{dir}/{slug}_sqlite_repo.go"),
                            format!("sqlite repository {target}"),
                            &repo,
                        )?;
                        run.render(
                            TemplateKind::SqliteQueries,
                            format!("assets/queries/sqlite/{feat_name}/{slug}.sql"),
                            format!("sqlite queries {target}"),
                            &repo,
                        )?;
                    }
                    MONGO_BACKEND => {
                        run.render(
                            TemplateKind::MongoRepo,
                            format!("{dir}/{slug}_mongo_repo.go"),
                            format!("mongo repository {target}"),
                            &repo,
                        )?;
                    }
                    other => {
                        warn!(
                            feature = feat_name,
                            backend = other,
                            "No repository template for backend, skipping"
                        );
                    }
                }
            }
        }

        for (aggregate_name, aggregate) in &feat.aggregates {
            let aggregate_ctx = builder.aggregate(feat_name, feat, aggregate_name, aggregate)?;
            let children: Vec<_> = aggregate_ctx
                .children
                .iter()
                .map(|child| builder.child_collection(feat_name, feat, &aggregate_ctx, child))
                .collect();

            let planned = self.emitter.plan(&dir, &aggregate_ctx, &children)?;
            debug!(
                feature = feat_name,
                aggregate = aggregate_name.as_str(),
                emitter = self.emitter.name(),
                files = planned.len(),
                "Planned aggregate"
            );
            for file in planned {
                run.render(file.template, file.path, file.target, &file.data)?;
            }
        }

        Ok(())
    }
}

/// Files written so far in one run.
struct Run<'g> {
    registry: &'g TemplateRegistry,
    output: &'g OutputRoot,
    files: Vec<PathBuf>,
}

impl<'g> Run<'g> {
    fn new(generator: &'g Generator) -> Self {
        Self {
            registry: &generator.registry,
            output: &generator.output,
            files: Vec::new(),
        }
    }

    fn render<T: Serialize>(
        &mut self,
        kind: TemplateKind,
        path: impl Into<PathBuf>,
        target: impl AsRef<str>,
        data: &T,
    ) -> Result<()> {
        let rendered = self.registry.render(kind, target.as_ref(), data)?;
        self.write(path, rendered)
    }

    fn write(&mut self, path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Result<()> {
        let path = path.into();
        self.output.write(&path, contents)?;
        self.files.push(path);
        Ok(())
    }
}

/// Feature directory relative to the output root.
pub fn feature_dir(feat_name: &str) -> String {
    format!("{FEATURE_ROOT}/{feat_name}")
}

fn skeleton_dirs(engine: &str) -> [String; 7] {
    [
        "internal/platform".to_string(),
        "internal/web".to_string(),
        FEATURE_ROOT.to_string(),
        "assets/templates".to_string(),
        format!("assets/migrations/{engine}"),
        format!("assets/seeds/{engine}"),
        format!("assets/queries/{engine}"),
    ]
}

fn feature_readme(feature: &FeatureContext) -> String {
    let mut readme = format!(
        "# {}\n\nGenerated feat skeleton.\n\nKind: {}\n",
        feature.package_name, feature.kind
    );

    let mut section = |title: &str, items: Vec<String>| {
        if items.is_empty() {
            return;
        }
        let _ = write!(readme, "\n## {title}\n\n");
        for item in items {
            let _ = writeln!(readme, "- {item}");
        }
    };

    section("Models", feature.models.clone());
    section("Service methods", feature.service_methods.clone());
    section(
        "Routes",
        feature
            .routes
            .iter()
            .map(|r| format!("`{} {}` -> {}", r.method, r.path, r.handler))
            .collect(),
    );
    section(
        "Pages",
        feature
            .pages
            .iter()
            .map(|p| {
                if p.uses.is_empty() {
                    format!("`{}`", p.route)
                } else {
                    format!("`{}` uses {}", p.route, p.uses.join(", "))
                }
            })
            .collect(),
    );
    readme
}

/// Load and generate from a configuration. Validation happens in
/// [`Generator::run`].
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    debug!(spec = %config.spec_path.display(), "Loading specification");
    let spec = Specification::load(&config.spec_path)?;
    let registry =
        TemplateRegistry::resolve(config.template_dir.as_deref(), &EnvTemplateConfigReader)?;
    let output = OutputRoot::new(&config.output_base, config.mode);
    Generator::new(spec, registry, output, GeneratorOptions::from_config(config)).run()
}
