//! stackdsl - CloudFormation blueprint compiler
//!
//! Compiles a named blueprint together with externally supplied parameters
//! (YAML/JSON files, inline defines) into a CloudFormation document in JSON
//! or YAML.

mod inputs;
mod output;
mod registry;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "stackdsl")]
#[command(about = "Compiles stack blueprints to CloudFormation", long_about = None)]
struct Args {
    /// Blueprint to compile
    blueprint: String,

    /// Destination file for the compiled template (stdout if omitted)
    #[arg(short, long, env = "STACKDSL_OUTPUT")]
    output: Option<PathBuf>,

    /// YAML file of external parameters (repeatable, merged in order)
    #[arg(short = 'y', long = "yaml", value_name = "FILE")]
    yaml: Vec<PathBuf>,

    /// JSON file of external parameters (repeatable, merged in order)
    #[arg(short = 'j', long = "json", value_name = "FILE")]
    json: Vec<PathBuf>,

    /// Inline external parameter, overrides file entries (repeatable)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    defines: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", env = "STACKDSL_FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "STACKDSL_LOG_LEVEL")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout is reserved for the compiled template.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "stackdsl={lvl},stackdsl_core={lvl},stackdsl_sqs={lvl}",
                    lvl = args.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let build = registry::lookup(&args.blueprint).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown blueprint '{}' (known blueprints: {})",
            args.blueprint,
            registry::names().join(", ")
        )
    })?;

    let params = inputs::gather(&args.yaml, &args.json, &args.defines)?;
    info!(
        blueprint = %args.blueprint,
        parameters = params.len(),
        "Compiling blueprint"
    );

    let template = build(&params)?;
    let rendered = output::render(&template, args.format, args.pretty)?;
    output::write_rendered(&rendered, args.output.as_deref())?;

    if let Some(path) = &args.output {
        info!(path = %path.display(), "Wrote template");
    }

    Ok(())
}
