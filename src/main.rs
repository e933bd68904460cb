//! Agent Forge CLI
//!
//! Usage:
//!   agent-forge [OPTIONS] [AGENT]
//!
//! Options:
//!   -c, --config <FILE>           Build configuration (TOML format)
//!   -a, --agents-dir <DIR>        Directory holding definition files
//!   -o, --output-dir <DIR>        Directory for generated markdown
//!   --max-include-depth <N>       Include nesting limit
//!   -n, --dry-run                 Render without writing files
//!   -v, --verbose                 Debug logging
//!   -h, --help                    Print help

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agent_forge::{build_all, build_named, BuildConfig};

#[derive(Parser)]
#[command(name = "agent-forge")]
#[command(about = "Build agent markdown files from definition files")]
struct Cli {
    /// Agent to build (builds every definition if not provided)
    agent: Option<String>,

    /// Build configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding definition files
    #[arg(short, long)]
    agents_dir: Option<PathBuf>,

    /// Directory for generated markdown (defaults to the agents directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum include nesting depth
    #[arg(long)]
    max_include_depth: Option<usize>,

    /// Render everything but do not write output files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show debug output, including advisory source context
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => match BuildConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => BuildConfig::default(),
    };

    if let Some(dir) = cli.agents_dir {
        config.agents_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = Some(dir);
    }
    if let Some(depth) = cli.max_include_depth {
        config.template.max_include_depth = depth;
    }
    config.dry_run = cli.dry_run;

    match &cli.agent {
        Some(name) => match build_named(name, &config) {
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => match build_all(&config) {
            Ok(report) => {
                println!(
                    "\n✓ Complete: {} agent(s) built, {} skipped, {} failed",
                    report.built(),
                    report.skipped(),
                    report.failed()
                );
                if report.failed() > 0 {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
