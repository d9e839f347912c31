//! Main chat loop orchestration.
//!
//! The prompt, the sends and the output run side by side: each user turn is
//! sent on its own task so Ctrl+C and `/stop` stay responsive while a reply
//! is awaited or typed out. All output goes through the readline
//! `SharedWriter` so it lands above the prompt.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use assistdesk_core::chat::{
    BoxChatBackend, ConversationController, MessageStore, StoreEvent, TurnOutcome,
};
use assistdesk_types::chat::{ChatMode, Sender};
use assistdesk_types::error::ChatError;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::clipboard;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use super::view::{bot_label, TranscriptView};

type Controller = ConversationController<BoxChatBackend>;

/// Run the interactive chat loop for one chat mode.
pub async fn run_chat_loop(state: &AppState, mode: ChatMode) -> anyhow::Result<()> {
    let backend_url = match mode {
        ChatMode::Patent => state.config.patent_api_url.clone(),
        ChatMode::Process => state.config.process_api_url.clone(),
    };

    let store = Arc::new(MessageStore::new());
    let controller: Arc<Controller> = Arc::new(ConversationController::new(
        state.backends.chat_backend(mode),
        Arc::clone(&store),
        state.engine,
    ));
    let conversation_id = controller.id().to_string();

    print_welcome_banner(mode, &backend_url, &conversation_id);
    info!(conversation = %conversation_id, mode = %mode, "chat session started");

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, mut writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let latest_turn = Arc::new(AtomicU64::new(0));
    let (finished_tx, finished_rx) = mpsc::unbounded_channel::<u64>();
    let view_task = tokio::spawn(drive_view(
        store.subscribe(),
        finished_rx,
        Arc::clone(&latest_turn),
        Arc::clone(&store),
        writer.clone(),
        TranscriptView::new(bot_label(mode), false),
    ));

    let renderer = ChatRenderer::new(mode);
    let default_transcript = state.default_transcript_path();

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Blank => continue,
            InputEvent::Interrupted => {
                if controller.stop() {
                    let _ = writeln!(writer, "\n  {}", style("Reply stopped.").dim());
                } else {
                    let _ = writeln!(
                        writer,
                        "  {}",
                        style("Press Ctrl+D to exit, or keep chatting.").dim()
                    );
                }
            }
            InputEvent::Line(text) => {
                if let Some(cmd) = commands::parse(&text) {
                    let keep_going = handle_command(
                        cmd,
                        &controller,
                        &renderer,
                        &default_transcript,
                        &mut writer,
                    )
                    .await;
                    if keep_going {
                        continue;
                    }
                    break;
                }

                let turn = latest_turn.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::spawn(run_turn(
                    Arc::clone(&controller),
                    text,
                    turn,
                    finished_tx.clone(),
                    writer.clone(),
                ));
            }
        }
    }

    controller.stop();
    view_task.abort();
    chat_input.flush();
    println!("\n  {}", style("Session ended.").dim());
    info!(conversation = %conversation_id, messages = store.len(), "chat session ended");
    Ok(())
}

/// Send one user turn and report back when its reveal is over.
async fn run_turn(
    controller: Arc<Controller>,
    text: String,
    turn: u64,
    finished: mpsc::UnboundedSender<u64>,
    mut writer: SharedWriter,
) {
    match controller.send(&text).await {
        Ok(TurnOutcome::Revealing(reveal)) => {
            let status = reveal.finished().await;
            debug!(turn, ?status, "reveal finished");
        }
        Ok(TurnOutcome::Failed(err)) => {
            warn!(turn, error = %err, "chat request failed");
        }
        Ok(TurnOutcome::EmptyReply) | Ok(TurnOutcome::Discarded) => {}
        Err(ChatError::Busy) => {
            let _ = writeln!(
                writer,
                "  {}",
                style("Still waiting for the last reply. Use /clear to start over.").yellow()
            );
            return;
        }
        Err(err) => {
            let _ = writeln!(writer, "  {} {err}", style("!").yellow().bold());
            return;
        }
    }
    let _ = finished.send(turn);
}

/// Print store events as they happen, closing the bot line when the
/// newest turn finishes.
async fn drive_view(
    mut events: broadcast::Receiver<StoreEvent>,
    mut finished: mpsc::UnboundedReceiver<u64>,
    latest_turn: Arc<AtomicU64>,
    store: Arc<MessageStore>,
    mut writer: SharedWriter,
    mut view: TranscriptView,
) {
    loop {
        let out = tokio::select! {
            biased;
            event = events.recv() => match event {
                Ok(event) => view.apply(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "transcript view lagged; resyncing");
                    match store.last() {
                        Some(last) => view.apply(&StoreEvent::LastReplaced(last)),
                        None => view.finish(),
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            Some(turn) = finished.recv() => {
                if turn == latest_turn.load(Ordering::SeqCst) {
                    view.finish()
                } else {
                    String::new()
                }
            }
            else => break,
        };

        if !out.is_empty() {
            let _ = write!(writer, "{out}");
        }
    }
}

/// Returns false when the loop should end.
async fn handle_command(
    cmd: ChatCommand,
    controller: &Controller,
    renderer: &ChatRenderer,
    default_transcript: &Path,
    writer: &mut SharedWriter,
) -> bool {
    match cmd {
        ChatCommand::Help => {
            let _ = write!(
                writer,
                "{}",
                commands::help_text(&default_transcript.display().to_string())
            );
        }
        ChatCommand::Stop => {
            let msg = if controller.stop() {
                "Reply stopped."
            } else {
                "Nothing to stop."
            };
            let _ = writeln!(writer, "  {}", style(msg).dim());
        }
        ChatCommand::Clear => controller.clear(),
        ChatCommand::Save(path) => {
            let path = path.map(PathBuf::from).unwrap_or_else(|| default_transcript.to_path_buf());
            match tokio::fs::write(&path, controller.export_transcript()).await {
                Ok(()) => {
                    info!(path = %path.display(), "transcript saved");
                    let _ = writeln!(
                        writer,
                        "  {} Transcript saved to {}",
                        style("✓").green().bold(),
                        style(path.display()).cyan()
                    );
                }
                Err(err) => {
                    let _ = writeln!(
                        writer,
                        "  {} Could not save transcript: {err}",
                        style("✗").red().bold()
                    );
                }
            }
        }
        ChatCommand::Copy => {
            let messages = controller.store().snapshot();
            match clipboard::last_bot_reply(&messages) {
                None => {
                    let _ = writeln!(writer, "  {}", style("No reply to copy yet.").dim());
                }
                Some(reply) => match clipboard::copy_to_clipboard(reply) {
                    Ok(()) => {
                        let _ = writeln!(writer, "  {} Copied", style("✓").green().bold());
                    }
                    Err(err) => {
                        let _ = writeln!(
                            writer,
                            "  {} Could not copy to clipboard: {err}",
                            style("✗").red().bold()
                        );
                    }
                },
            }
        }
        ChatCommand::History => {
            let messages = controller.store().snapshot();
            if messages.is_empty() {
                let _ = writeln!(writer, "  {}", style("No messages yet.").dim());
            }
            for message in messages {
                let label = match message.sender {
                    Sender::User => style("You").green().bold(),
                    Sender::Bot => style("Bot").cyan().bold(),
                };
                let body = match message.sender {
                    Sender::Bot => renderer.render_final(&message.text).trim_end().to_string(),
                    Sender::User => message.text.clone(),
                };
                let _ = writeln!(
                    writer,
                    "  {} {label}: {body}",
                    style(format!("[{}]", message.timestamp)).dim()
                );
            }
        }
        ChatCommand::Exit => return false,
        ChatCommand::Unknown(name) => {
            let _ = writeln!(
                writer,
                "  {} Unknown command {name}. Type /help for the list.",
                style("?").yellow().bold()
            );
        }
    }
    true
}
