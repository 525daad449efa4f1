//! Line-oriented event loop.
//!
//! Reads one [`CommandEvent`] per line, dispatches it, and writes one JSON
//! [`EventResponse`] per line. Events are handled strictly in arrival order;
//! a bad event or a storage fault produces an error response and the loop
//! moves on to the next line.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::dispatch::{Dispatcher, Outcome};
use crate::error::{Error, Result};
use crate::event::CommandEvent;
use crate::render::{render, render_error, Reply};

/// What the gateway receives back for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    /// Message to post.
    pub reply: Reply,
    /// Structured result, absent on faults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Fault description, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Events that produced an outcome, rejections included.
    pub handled: u64,
    /// Events refused by a business rule.
    pub rejected: u64,
    /// Events that ended in a fault.
    pub failed: u64,
}

/// Handle a single raw event line.
#[must_use]
pub fn handle_line(dispatcher: &Dispatcher, line: &str) -> EventResponse {
    match try_handle(dispatcher, line) {
        Ok(outcome) => EventResponse {
            reply: render(&outcome),
            outcome: Some(outcome),
            error: None,
        },
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &Error) -> EventResponse {
    if e.is_event_error() {
        warn!("Rejected malformed event: {}", e);
    } else {
        error!("Command failed: {}", e);
    }
    EventResponse {
        reply: render_error(e),
        outcome: None,
        error: Some(e.to_string()),
    }
}

fn try_handle(dispatcher: &Dispatcher, line: &str) -> Result<Outcome> {
    let event = CommandEvent::from_json(line)?;
    let command = event.to_command()?;
    dispatcher.dispatch(&event.invoker(), command)
}

/// Run the loop until `input` is exhausted.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run<R, W>(dispatcher: &Dispatcher, mut input: R, mut output: W) -> Result<ServeStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = ServeStats::default();
    let mut buf = Vec::new();

    info!("Waiting for command events");
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                debug!("Received event: {}", line.trim_end());
                handle_line(dispatcher, line)
            }
            Err(e) => {
                let e = Error::invalid_event(format!("event is not UTF-8: {e}"));
                error_response(&e)
            }
        };

        match &response.outcome {
            Some(outcome) => {
                stats.handled += 1;
                if outcome.is_rejected() {
                    stats.rejected += 1;
                }
            }
            None => stats.failed += 1,
        }

        let mut encoded = serde_json::to_string(&response).map_err(Error::from)?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
    }

    info!(
        handled = stats.handled,
        rejected = stats.rejected,
        failed = stats.failed,
        "Input closed"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn setup() -> (tempfile::TempDir, Dispatcher) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("restaurants.json"));
        (dir, Dispatcher::new(store))
    }

    fn responses(output: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_handle_line_add() {
        let (_dir, d) = setup();
        let response = handle_line(
            &d,
            r#"{"command": "add-restaurant", "user": {"id": "1"},
                "options": {"name": "A", "area": "B", "genre": "C", "review": "D"}}"#,
        );
        assert!(matches!(response.outcome, Some(Outcome::Added { .. })));
        assert!(response.error.is_none());
        assert!(!response.reply.ephemeral);
    }

    #[test]
    fn test_handle_line_bad_json() {
        let (_dir, d) = setup();
        let response = handle_line(&d, "{oops");
        assert!(response.outcome.is_none());
        assert!(response.error.unwrap().contains("invalid event"));
        assert!(response.reply.ephemeral);
    }

    #[tokio::test]
    async fn test_run_processes_lines_in_order() {
        let (_dir, d) = setup();
        let input = concat!(
            r#"{"command": "맛집추가", "user": {"id": "1"},"#,
            r#" "options": {"이름": "A", "지역": "Hongdae", "장르": "Ramen", "한줄평": "good"}}"#,
            "\n\n",
            r#"{"command": "add-restaurant", "user": {"id": "2"},"#,
            r#" "options": {"name": "a", "area": "HONGDAE", "genre": "x", "review": "y"}}"#,
            "\n",
            r#"{"command": "list-restaurants", "user": {"id": "3"}}"#,
            "\n",
            r#"{"command": "order-pizza", "user": {"id": "3"}}"#,
            "\n",
        );
        let mut output = Vec::new();

        let stats = run(&d, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(
            stats,
            ServeStats {
                handled: 3,
                rejected: 1,
                failed: 1
            }
        );

        let lines = responses(&output);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["outcome"]["status"], "added");
        assert_eq!(lines[1]["outcome"]["reason"]["kind"], "duplicate");
        assert_eq!(lines[2]["outcome"]["total"], 1);
        assert!(lines[3]["error"].as_str().unwrap().contains("order-pizza"));
    }

    #[tokio::test]
    async fn test_run_survives_non_utf8_line() {
        let (_dir, d) = setup();
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(br#"{"command": "list-restaurants", "user": {"id": "1"}}"#);
        let mut output = Vec::new();

        let stats = run(&d, &input[..], &mut output).await.unwrap();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.handled, 1);

        let lines = responses(&output);
        assert_eq!(lines.len(), 2);
        assert!(lines[0]["error"].as_str().unwrap().contains("UTF-8"));
        assert_eq!(lines[1]["outcome"]["status"], "listing");
    }

    #[tokio::test]
    async fn test_run_survives_storage_fault() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every save fail.
        let path = dir.path().join("restaurants.json");
        std::fs::create_dir(&path).unwrap();
        let d = Dispatcher::new(Store::new(&path));

        let input = concat!(
            r#"{"command": "add-restaurant", "user": {"id": "1"},"#,
            r#" "options": {"name": "A", "area": "B", "genre": "C", "review": "D"}}"#,
            "\n",
            r#"{"command": "list-restaurants", "user": {"id": "1"}}"#,
            "\n",
        );
        let mut output = Vec::new();

        let stats = run(&d, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(
            stats,
            ServeStats {
                handled: 1,
                rejected: 0,
                failed: 1
            }
        );

        let lines = responses(&output);
        assert_eq!(lines.len(), 2);
        assert!(lines[0]["error"].as_str().unwrap().contains("failed to write"));
        assert!(lines[0].get("outcome").is_none());
        assert_eq!(lines[1]["outcome"]["total"], 0);
    }

    #[tokio::test]
    async fn test_run_empty_input() {
        let (_dir, d) = setup();
        let mut output = Vec::new();
        let stats = run(&d, &b""[..], &mut output).await.unwrap();
        assert_eq!(stats, ServeStats::default());
        assert!(output.is_empty());
    }
}
