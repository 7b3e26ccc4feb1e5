//! aquamarine CLI entrypoint
//! Parses command-line arguments and dispatches to the generator.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use aquamarine::core::config::{AggregateMode, DEFAULT_OUTPUT_BASE, GeneratorConfig, Mode};
use aquamarine::core::spec::DEFAULT_SPEC_FILE;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aquamarine")]
#[command(author, version, about = "Generate a Go application from aquamarine.yaml", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate the application tree under <output-base>/<mode>
    Generate {
        /// Write to the dev output root instead of prod
        #[arg(long)]
        dev: bool,
        /// Specification file
        #[arg(long, default_value = DEFAULT_SPEC_FILE)]
        spec: PathBuf,
        /// Directory holding the mode-scoped output roots
        #[arg(long, default_value = DEFAULT_OUTPUT_BASE)]
        output_base: PathBuf,
        /// Custom template directory (overrides AQUAMARINE_TEMPLATE_DIR)
        #[arg(long)]
        template_dir: Option<PathBuf>,
        /// Reject field types with no Go mapping
        #[arg(long)]
        strict: bool,
        /// What to emit for aggregates: skip or split
        #[arg(long, default_value_t = AggregateMode::Skip)]
        aggregates: AggregateMode,
        /// Enable debug logging
        #[arg(long, short)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    // Initialize logging with default level INFO, DEBUG with --verbose
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            dev,
            spec,
            output_base,
            template_dir,
            strict,
            aggregates,
            verbose,
        } => {
            init_logging(verbose);
            let config = GeneratorConfig {
                spec_path: spec,
                output_base,
                mode: Mode::from_dev_flag(dev),
                template_dir,
                strict_types: strict,
                aggregates,
            };

            info!("Starting aquamarine generate ({})", config.mode);
            let report = aquamarine::generate(&config)
                .with_context(|| format!("Failed to generate from {}", config.spec_path.display()))?;

            println!(
                "Generated {} files in {}",
                report.files.len(),
                report.output_root.display()
            );
            Ok(())
        }
    }
}
