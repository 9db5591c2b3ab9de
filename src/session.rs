//! Interactive read loop
//!
//! Generic over the reader and writer so tests can script a whole session.

use crate::intent::{IntentPipeline, CONFIRM_TOKEN};
use crate::ledger::Ledger;
use crate::report::render::{thousands, CURRENCY};
use crate::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

pub const EXIT_COMMAND: &str = "exit";

const INPUT_PROMPT: &str = "Enter a transaction, a report request or a question ('exit' to quit): ";

pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

/// Run until `exit` or end of input, then dump the ledger
pub async fn run_session<R, W>(pipeline: &mut IntentPipeline, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let prompt = if pipeline.is_awaiting_confirmation() {
            format!("Confirm ('{}' to save): ", CONFIRM_TOKEN)
        } else {
            INPUT_PROMPT.to_string()
        };
        writer.write_all(prompt.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            info!("Input closed");
            break;
        };

        if !pipeline.is_awaiting_confirmation() {
            if is_exit(&line) {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
        }

        let outcome = pipeline.submit(&line).await;
        writer.write_all(format!("{}\n", outcome).as_bytes()).await?;
    }

    writer.write_all(dump_ledger(pipeline.ledger())?.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// One JSON line per record, then all-time totals
pub fn dump_ledger(ledger: &Ledger) -> Result<String> {
    let mut out = String::from("\nLedger contents:\n");
    for record in ledger.all() {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    out.push_str(&format!(
        "{} record(s), revenue {} {}, cost {} {}\n",
        ledger.len(),
        thousands(ledger.total_revenue()),
        CURRENCY,
        thousands(ledger.total_cost()),
        CURRENCY
    ));
    Ok(out)
}
