//! One-shot question: send a single turn, type out the reply, exit.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use console::style;
use serde_json::json;
use tokio::sync::broadcast;

use assistdesk_core::chat::{ConversationController, MessageStore, StoreEvent, TurnOutcome};
use assistdesk_types::chat::{ChatMode, Sender, ERROR_REPLY_TEXT};

use crate::cli::ui;
use crate::state::AppState;

use super::view::{bot_label, TranscriptView};

/// Ask `text` in `mode` and print the reply as it is revealed.
///
/// Ctrl+C stops the reveal and keeps the partial reply. With `save`, the
/// transcript is written to that path afterwards.
pub async fn ask_once(
    state: &AppState,
    mode: ChatMode,
    text: &str,
    save: Option<&str>,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let store = Arc::new(MessageStore::new());
    let controller = ConversationController::new(
        state.backends.chat_backend(mode),
        Arc::clone(&store),
        state.engine,
    );
    let mut events = store.subscribe();

    let spinner = ui::spinner("Thinking...", quiet || json);
    let outcome = controller.send(text).await;
    spinner.finish_and_clear();

    match outcome? {
        TurnOutcome::Revealing(ticket) => {
            if json || quiet {
                ticket.finished().await;
            } else {
                let mut view = TranscriptView::new(bot_label(mode), false);
                let mut stdout = std::io::stdout();

                let reveal = ticket.finished();
                let interrupt = tokio::signal::ctrl_c();
                tokio::pin!(reveal, interrupt);
                let mut interrupted = false;

                loop {
                    tokio::select! {
                        biased;
                        event = events.recv() => match event {
                            Ok(event) => write_out(&mut stdout, &view_output(&mut view, &event)),
                            Err(broadcast::error::RecvError::Lagged(_)) => {
                                if let Some(last) = store.last() {
                                    write_out(&mut stdout, &view.apply(&StoreEvent::LastReplaced(last)));
                                }
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        },
                        _ = &mut reveal => break,
                        _ = &mut interrupt, if !interrupted => {
                            interrupted = true;
                            controller.stop();
                        }
                    }
                }

                // Anything published just before the reveal ended.
                while let Ok(event) = events.try_recv() {
                    write_out(&mut stdout, &view_output(&mut view, &event));
                }
                write_out(&mut stdout, &view.finish());
            }
        }
        TurnOutcome::Failed(err) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "mode": mode,
                        "query": text,
                        "ok": false,
                        "error": err.to_string(),
                    }))?
                );
            } else {
                ui::failure(&format!("{ERROR_REPLY_TEXT} ({err})"));
            }
            anyhow::bail!("{} request failed: {err}", mode.title());
        }
        TurnOutcome::EmptyReply => {
            if !json && !quiet {
                ui::info("The backend returned an empty reply.");
            }
        }
        TurnOutcome::Discarded => {}
    }

    if json {
        let reply = store.last().filter(|m| m.sender == Sender::Bot);
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "mode": mode,
                "query": text,
                "ok": true,
                "reply": reply.as_ref().map(|m| m.text.as_str()).unwrap_or_default(),
                "timestamp": reply.as_ref().map(|m| m.timestamp.as_str()).unwrap_or_default(),
            }))?
        );
    }

    if let Some(path) = save {
        tokio::fs::write(path, controller.export_transcript())
            .await
            .with_context(|| format!("Failed to write transcript to {path}"))?;
        if !quiet && !json {
            println!("  {} Transcript saved to {}", style("✓").green().bold(), style(path).cyan());
        }
    }

    Ok(())
}

/// The view, minus the placeholder line the spinner already stood in for.
fn view_output(view: &mut TranscriptView, event: &StoreEvent) -> String {
    match event {
        StoreEvent::Appended(message) if message.is_placeholder() => String::new(),
        other => view.apply(other),
    }
}

fn write_out(stdout: &mut std::io::Stdout, text: &str) {
    if text.is_empty() {
        return;
    }
    let _ = write!(stdout, "{text}");
    let _ = stdout.flush();
}
