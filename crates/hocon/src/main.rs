//! hocon CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report::ErrorFormat;

mod commands;
mod loader;
mod report;

#[derive(Parser)]
#[command(name = "hocon")]
#[command(version)]
#[command(about = "Layer, resolve and query configuration files", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How to print errors
    #[arg(long, global = true, value_enum, default_value_t = ErrorFormat::Text)]
    error_format: ErrorFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge files (earlier files win), resolve substitutions and print the result
    Resolve {
        /// Configuration files (.json, .yaml, .yml, .properties)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Keep unresolvable substitutions instead of failing
        #[arg(long)]
        allow_unresolved: bool,

        /// Don't look up missing substitutions in the environment
        #[arg(long)]
        no_env: bool,

        /// Only resolve values below PATH
        #[arg(long, value_name = "PATH")]
        restrict: Option<String>,

        /// Print JSON instead of HOCON
        #[arg(long)]
        json: bool,

        /// Keep comments attached to values
        #[arg(long)]
        comments: bool,

        /// Annotate each value with where it came from
        #[arg(long)]
        origin_comments: bool,

        /// Print compact single-line JSON
        #[arg(long, conflicts_with_all = ["json", "comments", "origin_comments"])]
        concise: bool,
    },

    /// Print one value from the resolved configuration
    Get {
        /// Path expression, e.g. server.port
        path: String,

        /// Configuration files (.json, .yaml, .yml, .properties)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Don't look up missing substitutions in the environment
        #[arg(long)]
        no_env: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "hocon=debug" } else { "hocon=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", report::render(&err, cli.error_format));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Resolve {
            files,
            allow_unresolved,
            no_env,
            restrict,
            json,
            comments,
            origin_comments,
            concise,
        } => commands::resolve::execute(commands::resolve::ResolveArgs {
            files,
            allow_unresolved,
            no_env,
            restrict,
            json,
            comments,
            origin_comments,
            concise,
        }),
        Commands::Get {
            path,
            files,
            no_env,
        } => commands::get::execute(commands::get::GetArgs {
            path,
            files,
            no_env,
        }),
    }
}
