//! Interactive session loop
//!
//! Generic over input and output so sessions can be driven from memory in
//! tests. Requests are handled strictly one at a time.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use stepwise_history::InteractionLog;

use crate::levels::Responder;
use crate::Result;

pub const PROMPT: &str = "You: ";
pub const FAREWELL: &str = "Bye!";

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Run a session until end of input or an exit command
pub async fn run_session<R, W>(
    responder: &dyn Responder,
    mut log: Option<&mut InteractionLog>,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("◆ LEVEL {} SESSION STARTED", responder.level());
    output
        .write_all(format!("{}\n", responder.banner()).as_bytes())
        .await?;

    let mut lines = input.lines();
    let mut handled = 0usize;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(raw) = lines.next_line().await? else {
            output.write_all(format!("\n{}\n", FAREWELL).as_bytes()).await?;
            break;
        };

        // blank lines are ordinary requests
        let query = raw.trim();
        if is_exit_command(query) {
            output.write_all(format!("{}\n", FAREWELL).as_bytes()).await?;
            break;
        }

        let reply = responder.respond(query).await;
        output.write_all(format!("{}\n", reply).as_bytes()).await?;
        output.flush().await?;
        handled += 1;

        if let Some(log) = log.as_deref_mut() {
            if let Err(e) = log.record(query, &reply).await {
                warn!("◆ LOG WRITE FAILED: {}", e);
            }
        }
    }

    output.flush().await?;
    info!("◆ LEVEL {} SESSION ENDED AFTER {} QUERIES", responder.level(), handled);
    Ok(())
}

/// Answer one message, logging it like a session turn
pub async fn answer_once(
    responder: &dyn Responder,
    log: Option<&mut InteractionLog>,
    message: &str,
) -> String {
    let query = message.trim();
    let reply = responder.respond(query).await;

    if let Some(log) = log {
        if let Err(e) = log.record(query, &reply).await {
            warn!("◆ LOG WRITE FAILED: {}", e);
        }
    }
    reply
}
