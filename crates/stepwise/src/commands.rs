//! Stepwise command implementations

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{debug, warn};

use stepwise_agent::{
    answer_once, detect_steps, run_session, CalculatorResponder, ChatResponder, Responder,
    StepResponder,
};
use stepwise_config::Config;
use stepwise_history::InteractionLog;

/// Resolve configuration from the environment and CLI overrides
fn load_config(log_dir: Option<PathBuf>) -> Result<Config> {
    let config = Config::from_env().context("Invalid environment configuration")?;
    Ok(match log_dir {
        Some(dir) => config.with_log_dir(dir),
        None => config,
    })
}

fn responder_for(level: u8, config: &Config) -> Box<dyn Responder> {
    match level {
        1 => Box::new(ChatResponder::from_config(config)),
        2 => Box::new(CalculatorResponder::from_config(config)),
        _ => Box::new(StepResponder::from_config(config)),
    }
}

/// Run a level interactively, or answer a single message
pub async fn level_command(level: u8, message: Option<String>, log_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(log_dir)?;
    let responder = responder_for(level, &config);

    let log_path = config.log_path(level);
    let mut log = match InteractionLog::open(&log_path).await {
        Ok(log) => Some(log),
        Err(e) => {
            warn!("◆ INTERACTIONS WILL NOT BE LOGGED ({}): {}", log_path.display(), e);
            None
        }
    };

    let mut interrupted = false;

    if let Some(msg) = message {
        let reply = answer_once(responder.as_ref(), log.as_mut(), &msg).await;
        println!("{}", reply);
    } else {
        let input = BufReader::new(tokio::io::stdin());
        let output = tokio::io::stdout();

        tokio::select! {
            result = run_session(responder.as_ref(), log.as_mut(), input, output) => {
                result.context("Session aborted")?;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("◆ INTERRUPTED");
                println!("\nBye!");
                interrupted = true;
            }
        }
    }

    if let Some(log) = log {
        if let Err(e) = log.close().await {
            warn!("◆ LOG CLOSE FAILED: {}", e);
        }
    }

    // a pending blocking stdin read keeps the runtime from shutting down
    if interrupted {
        std::process::exit(0);
    }

    Ok(())
}

/// Print detected steps as JSON
pub fn plan_command(request: &str) -> Result<()> {
    let steps = detect_steps(request);
    let json = serde_json::to_string_pretty(&steps).context("Failed to encode steps")?;
    println!("{}", json);
    Ok(())
}

/// Show resolved configuration
pub fn status_command(log_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(log_dir)?;

    println!("◆ Stepwise Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "API Key:   {}",
        if config.has_api_key() {
            "[Set]"
        } else {
            "[Missing] (local answers only)"
        }
    );
    println!("Endpoint:  {}", config.api_base);
    println!("Model:     {}", config.model);
    println!("Temp:      {}", config.temperature);
    println!(
        "Logs:      {} {}",
        config.log_dir.display(),
        if config.log_dir.exists() {
            "[OK]"
        } else {
            "[Missing]"
        }
    );

    Ok(())
}
