//! Stepwise - a tutorial assistant in three levels

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{level_command, plan_command, status_command};

/// Stepwise - knowledge, calculator and multi-step agent
#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "◆ A tutorial assistant in three levels")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Directory for interaction logs
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Level 1: knowledge only, refuses arithmetic
    Level1 {
        /// Answer one message and exit
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Level 2: knowledge plus calculator
    Level2 {
        /// Answer one message and exit
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Level 3: multi-step agent with memory
    Level3 {
        /// Answer one message and exit
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Print the steps detected in a request as JSON
    Plan {
        /// Free-form request
        request: String,
    },
    /// Show resolved configuration
    Status,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let log_dir = cli.log_dir;

    match cli.command {
        Commands::Level1 { message } => {
            if let Err(e) = level_command(1, message, log_dir).await {
                error!("Level 1 failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Level2 { message } => {
            if let Err(e) = level_command(2, message, log_dir).await {
                error!("Level 2 failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Level3 { message } => {
            if let Err(e) = level_command(3, message, log_dir).await {
                error!("Level 3 failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Plan { request } => {
            if let Err(e) = plan_command(&request) {
                error!("Plan failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Status => {
            if let Err(e) = status_command(log_dir) {
                error!("Status failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}
