//! Consul registrar - registers this host's service with the local Consul agent.
//!
//! Registration inputs come from the environment:
//!
//! - `APP_NAME` - name of the service being registered
//! - `APP_PORT` - port the service listens on
//! - `TAGS` - comma-separated tags
//! - `CONSUL_PORT` - port of the local Consul agent (usually 8500)
//! - `HEALTH_CHECK_TYPE` - optional, `http` or `grpc`
//! - `HEALTH_CHECK_ENDPOINT` - optional health check endpoint
//!
//! The agent is tried up to ten times, one second apart.

use clap::{Parser, ValueEnum};
use registrar::{RegistrarConfig, SUCCESS_MESSAGE, TokioSleeper, load_dotenv};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Register a service with the local Consul agent
#[derive(Parser)]
#[command(name = "consul-registrar")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Register a service with the local Consul agent, retrying while it starts")]
#[command(long_about = None)]
struct Cli {
    /// Load environment variables from this file first
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "REGISTRAR_LOG_FORMAT")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match cli.log_format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().flatten_event(true).init(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = load_dotenv(cli.env_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let config = RegistrarConfig::from_env();

    match registrar::run(&config, TokioSleeper).await {
        Ok(_) => {
            println!("{SUCCESS_MESSAGE}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
