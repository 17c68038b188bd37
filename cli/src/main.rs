mod commands;

use clap::{Parser, Subcommand};
use commands::{print_grammar, print_host_paths, print_mounts, translate};
use hostmap_core::{DEFAULT_CLI_PATH, Settings};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hostmap")]
#[command(about = "Translate container paths in container CLI invocations into host paths")]
struct Cli {
    /// Path of the wrapped container CLI
    #[arg(long, global = true, env = "HOSTMAP_CLI_PATH", default_value = DEFAULT_CLI_PATH)]
    cli_path: PathBuf,

    /// Use a built-in compose grammar when the CLI has no compose subcommand
    #[arg(long, global = true, env = "HOSTMAP_COMPOSE_FALLBACK")]
    compose_fallback: bool,

    /// Directory for rewritten compose files
    #[arg(long, global = true, env = "HOSTMAP_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Base directory of relative paths (defaults to the current directory)
    #[arg(long, global = true)]
    working_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rewritten argument list, one argument per line
    Translate {
        /// Keep rewritten compose files instead of removing them on exit
        #[arg(long)]
        keep: bool,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Arguments as they would be passed to the container CLI
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the option grammar inferred from the CLI's help as JSON
    Grammar {
        /// Subcommand path, e.g. `container run`; empty for global options
        subcommand: Vec<String>,
    },
    /// Print the mount table of the enclosing container
    Mounts,
    /// Print the host path backing each container path
    HostPath {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings {
        cli_path: cli.cli_path,
        compose_fallback: cli.compose_fallback,
        temp_dir: cli.temp_dir,
        working_dir: cli.working_dir,
    };
    tracing::debug!(?settings, "Loaded settings");

    match cli.command {
        Commands::Translate {
            keep,
            timeout,
            args,
        } => {
            translate(settings, args, keep, timeout.map(Duration::from_secs)).await?;
        }
        Commands::Grammar { subcommand } => {
            print_grammar(settings, subcommand)?;
        }
        Commands::Mounts => {
            print_mounts(settings)?;
        }
        Commands::HostPath { paths } => {
            print_host_paths(settings, paths)?;
        }
    }

    Ok(())
}
