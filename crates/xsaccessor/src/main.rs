use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use xsaccessor::commands::{run_keys, run_positions, run_replay, run_stats};
use xsaccessor::{OutputFormat, logging};
use xsaccessor_intern::{InternConfig, InternContext};

/// xsaccessor - key and array-index interning for generated accessors
#[derive(Parser)]
#[command(name = "xsaccessor")]
#[command(about = "Exercise and inspect xsaccessor interning", long_about = None)]
#[command(version)]
struct Cli {
    /// Interning config (defaults to <config dir>/xsaccessor/intern.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log registry growth and assignments
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Append registry statistics to the output
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Intern hash keys and print their ids
    Keys {
        /// Keys to intern, in order
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Resolve external array positions to internal indices
    Positions {
        /// Positions to resolve, in order
        #[arg(required = true, allow_negative_numbers = true)]
        positions: Vec<i64>,
    },
    /// Replay a script of `key <text>` / `index <n>` lines
    Replay {
        /// Script file
        file: PathBuf,
    },
    /// Print statistics for a freshly configured context
    Stats,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<InternConfig> {
    let config = match path {
        Some(path) => InternConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => InternConfig::load_or_default().context("Failed to load default config")?,
    };
    debug!(?config, "loaded interning config");
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let ctx = InternContext::with_config(&config)?;

    let mut report = match &cli.command {
        Commands::Keys { keys } => run_keys(&ctx, keys),
        Commands::Positions { positions } => run_positions(&ctx, positions)?,
        Commands::Replay { file } => run_replay(&ctx, file)?,
        Commands::Stats => run_stats(&ctx),
    };
    if cli.stats {
        report.stats = Some(ctx.stats());
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    println!("{}", report.render(format)?.trim_end());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
