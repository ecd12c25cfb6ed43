//! configstore CLI
//!
//! Entry point for the `configstore` command-line tool.

use clap::{Parser, Subcommand};
use configstore::config::{EffectiveConfig, DEFAULT_CONFIG_FILE};
use configstore::error::ConfigStoreError;
use configstore::{values, JsonConfigWriter, RoleManifest, Workspace};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

#[derive(Parser)]
#[command(name = "configstore")]
#[command(about = "Assemble per-job configuration from release defaults and opinions", version)]
struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    debug: u8,

    /// Path to the project config file (default: configstore.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Role manifest file
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Light opinions file
    #[arg(long, global = true)]
    light: Option<PathBuf>,

    /// Dark opinions file
    #[arg(long, global = true)]
    dark: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a JSON config for every job of every role
    Build {
        /// Output directory (replaced on every run)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write summary.json into the output directory
        #[arg(long)]
        summary: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the assembled properties of one job
    Show {
        /// Role name
        role: String,

        /// Job name within the role
        job: String,
    },

    /// Print chart values as YAML
    Values,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ConfigStoreError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = EffectiveConfig::build(Some(&config_path), Some(cli_overrides(&cli)))?;
    tracing::debug!(sources = config.sources.len(), "resolved configuration");

    match cli.command {
        Commands::Build { json, .. } => {
            let workspace = Workspace::load(&config)?;
            let writer = JsonConfigWriter::new().with_summary(config.write_summary());
            let summary =
                writer.write_configs(&workspace.manifest, &workspace.assembler(), &config.output_dir())?;

            if json {
                let output = summary
                    .to_json()
                    .map_err(|e| ConfigStoreError::Serialize(e.to_string()))?;
                println!("{}", output);
            } else {
                println!("{}", summary.to_human());
            }
        }
        Commands::Show { role, job } => {
            let workspace = Workspace::load(&config)?;
            let properties = workspace.assemble_unit(&role, &job)?;
            let output = serde_json::to_string_pretty(&properties)
                .map_err(|e| ConfigStoreError::Serialize(e.to_string()))?;
            println!("{}", output);
        }
        Commands::Values => {
            let manifest = RoleManifest::load(&config.manifest_path())?;
            let values = values::make_values(&manifest, &config.values_defaults());
            let output =
                values::to_yaml(&manifest, &values).map_err(|e| ConfigStoreError::Serialize(e.to_string()))?;
            print!("{}", output);
        }
    }

    Ok(())
}

/// CLI flags as the highest-precedence config layer
fn cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();
    let path_value = |p: &PathBuf| Value::String(p.to_string_lossy().to_string());

    if let Some(ref manifest) = cli.manifest {
        overrides.insert("manifest".to_string(), path_value(manifest));
    }

    let mut opinions = Map::new();
    if let Some(ref light) = cli.light {
        opinions.insert("light".to_string(), path_value(light));
    }
    if let Some(ref dark) = cli.dark {
        opinions.insert("dark".to_string(), path_value(dark));
    }
    if !opinions.is_empty() {
        overrides.insert("opinions".to_string(), Value::Object(opinions));
    }

    if let Commands::Build {
        ref output, summary, ..
    } = cli.command
    {
        let mut out = Map::new();
        if let Some(dir) = output {
            out.insert("dir".to_string(), path_value(dir));
        }
        if summary {
            out.insert("summary".to_string(), json!(true));
        }
        if !out.is_empty() {
            overrides.insert("output".to_string(), Value::Object(out));
        }
    }

    Value::Object(overrides)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!(?filter, "logging initialized");
}
