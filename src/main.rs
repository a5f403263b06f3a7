//! ticket2pr - turn a ticket into a pull request
//!
//! CLI binary: run a single ticket, serve the HTTP endpoint, or check
//! GitHub authentication.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "ticket2pr")]
#[command(about = "Clone a repository, apply a ticket and open a pull request")]
#[command(version)]
struct Cli {
    /// Log output format (logs go to stderr; filter with RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one ticket end to end
    Run {
        /// Source repository URL
        #[arg(long)]
        url: String,

        /// Ticket description (prompted for when omitted)
        #[arg(long)]
        description: Option<String>,

        /// Print the result as JSON instead of styled output
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP endpoint
    Serve {
        /// Address to bind (overrides TICKET2PR_ADDR)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },

    /// GitHub authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

type InitError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(format: LogFormat, default_directive: &str) -> Result<(), InitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_directive = match cli.command {
        Commands::Serve { .. } => "ticket2pr=info",
        _ => "ticket2pr=warn",
    };
    if let Err(e) = init_tracing(cli.log_format, default_directive) {
        anstream::eprintln!("warning: logging disabled: {e}");
    }

    match cli.command {
        Commands::Run {
            url,
            description,
            json,
        } => {
            let opened = cli::run_ticket(&url, description, json)
                .await
                .inspect_err(|e| {
                    if e.is_config() {
                        anstream::eprintln!("hint: run `ticket2pr auth setup`");
                    }
                })?;
            if !opened {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Serve { addr } => cli::run_serve(addr).await?,
        Commands::Auth { action } => match action {
            AuthAction::Test => cli::run_auth_test().await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(ExitCode::SUCCESS)
}
