//! Conversation controller: one user turn at a time.
//!
//! Per turn the controller walks this state machine:
//!
//! ```text
//! Idle -> Sent              user message + "Thinking..." placeholder appended
//! Sent -> AwaitingResponse  request dispatched
//! AwaitingResponse -> Revealing   reply received, reveal started into the last slot
//! AwaitingResponse -> Failed      request rejected, placeholder replaced by error turn
//! Revealing -> Idle         reveal completed, or stopped (text left at last prefix)
//! ```
//!
//! At most one bot turn is in flight. A `send` while a reply is awaited is
//! rejected with [`ChatError::Busy`]; a `send` while a reveal is running first
//! fast-forwards that reveal to its full text. `clear` bumps an epoch so a
//! reply that arrives for a cleared conversation is dropped instead of
//! landing in the empty log.

use std::sync::{Arc, Mutex};

use assistdesk_types::chat::{ChatMessage, ERROR_REPLY_TEXT};
use assistdesk_types::error::{ChatError, RequestError};
use chrono::Local;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::ChatBackend;
use tokio::sync::watch;

use super::reveal::{wait_finished, RevealEngine, RevealHandle, RevealStatus};
use super::store::MessageStore;
use super::transcript;

/// Where the current turn is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sent,
    AwaitingResponse,
    Revealing,
    Failed,
}

/// The reveal started by one particular `send`.
///
/// Watching the ticket follows that turn's reveal even if a later send
/// fast-forwards it or a `clear` cancels it.
#[derive(Debug, Clone)]
pub struct RevealTicket {
    chars: usize,
    status: watch::Receiver<RevealStatus>,
}

impl RevealTicket {
    /// Length of the reply in characters.
    pub fn chars(&self) -> usize {
        self.chars
    }

    pub fn status(&self) -> RevealStatus {
        *self.status.borrow()
    }

    /// Resolve once this reveal completes or is cancelled.
    pub async fn finished(&self) -> RevealStatus {
        wait_finished(self.status.clone()).await
    }
}

/// How a `send` ended from the caller's point of view.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Reply received; its reveal is running.
    Revealing(RevealTicket),
    /// The backend answered with an empty string.
    EmptyReply,
    /// The request failed; the error turn is in the log.
    Failed(RequestError),
    /// The conversation was cleared while the request was in flight.
    Discarded,
}

/// Current local time as a display string, e.g. `3:04:05 PM`.
pub fn local_timestamp() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}

struct ActiveReveal {
    handle: RevealHandle,
    timestamp: String,
}

struct TurnSlot {
    phase: TurnPhase,
    epoch: u64,
    reveal: Option<ActiveReveal>,
}

impl TurnSlot {
    /// Phase with natural reveal completion folded in.
    fn current_phase(&self) -> TurnPhase {
        match (self.phase, &self.reveal) {
            (TurnPhase::Revealing, Some(active)) if active.handle.is_running() => {
                TurnPhase::Revealing
            }
            (TurnPhase::Revealing, _) => TurnPhase::Idle,
            (phase, _) => phase,
        }
    }
}

/// Drives a single conversation against one chat backend.
pub struct ConversationController<B: ChatBackend> {
    id: Uuid,
    backend: B,
    store: Arc<MessageStore>,
    engine: RevealEngine,
    clock: fn() -> String,
    turn: Mutex<TurnSlot>,
}

impl<B: ChatBackend> ConversationController<B> {
    pub fn new(backend: B, store: Arc<MessageStore>, engine: RevealEngine) -> Self {
        Self {
            id: Uuid::now_v7(),
            backend,
            store,
            engine,
            clock: local_timestamp,
            turn: Mutex::new(TurnSlot {
                phase: TurnPhase::Idle,
                epoch: 0,
                reveal: None,
            }),
        }
    }

    /// Replace the timestamp source (tests use a fixed clock).
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.lock().expect("turn lock poisoned").current_phase()
    }

    /// Send a user turn and start revealing the reply.
    ///
    /// Returns once the reply has arrived and its reveal has started (or the
    /// request failed). Request failures are not errors here: they become a
    /// terminal bot turn and are reported as [`TurnOutcome::Failed`].
    pub async fn send(&self, text: &str) -> Result<TurnOutcome, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let epoch = {
            let mut turn = self.turn.lock().expect("turn lock poisoned");
            match turn.current_phase() {
                TurnPhase::Sent | TurnPhase::AwaitingResponse => return Err(ChatError::Busy),
                TurnPhase::Revealing => self.fast_forward(&mut turn),
                TurnPhase::Idle | TurnPhase::Failed => {}
            }
            turn.reveal = None;

            self.store.append(ChatMessage::user(text, (self.clock)()));
            self.store.append(ChatMessage::placeholder());
            turn.phase = TurnPhase::Sent;
            turn.epoch
        };

        debug!(conversation = %self.id, backend = self.backend.name(), "dispatching chat request");
        self.set_phase_if_current(epoch, TurnPhase::AwaitingResponse);
        let result = self.backend.send_message(text).await;

        let mut turn = self.turn.lock().expect("turn lock poisoned");
        if turn.epoch != epoch {
            debug!(conversation = %self.id, "conversation cleared while awaiting reply, discarding");
            return Ok(TurnOutcome::Discarded);
        }

        match result {
            Err(err) => {
                warn!(
                    conversation = %self.id,
                    backend = self.backend.name(),
                    error = %err,
                    "chat request failed"
                );
                self.store
                    .replace_last(ChatMessage::bot(ERROR_REPLY_TEXT, (self.clock)()));
                turn.phase = TurnPhase::Failed;
                Ok(TurnOutcome::Failed(err))
            }
            Ok(reply) => {
                let timestamp = (self.clock)();
                let chars = reply.response.chars().count();
                let store = Arc::clone(&self.store);
                let tick_timestamp = timestamp.clone();

                let handle = self.engine.start(reply.response, move |prefix| {
                    store.replace_last(ChatMessage::bot(prefix, tick_timestamp.clone()));
                });

                match handle {
                    Some(handle) => {
                        info!(conversation = %self.id, chars, "reply received, revealing");
                        let ticket = RevealTicket {
                            chars,
                            status: handle.subscribe_status(),
                        };
                        turn.reveal = Some(ActiveReveal { handle, timestamp });
                        turn.phase = TurnPhase::Revealing;
                        Ok(TurnOutcome::Revealing(ticket))
                    }
                    None => {
                        self.store.replace_last(ChatMessage::bot("", timestamp));
                        turn.phase = TurnPhase::Idle;
                        Ok(TurnOutcome::EmptyReply)
                    }
                }
            }
        }
    }

    /// Stop the running reveal, leaving the text at its last prefix.
    ///
    /// Returns whether a reveal was actually stopped.
    pub fn stop(&self) -> bool {
        let mut turn = self.turn.lock().expect("turn lock poisoned");
        let stopped = match turn.reveal.take() {
            Some(active) if active.handle.is_running() => {
                active.handle.cancel();
                info!(conversation = %self.id, revealed = active.handle.revealed(), "reveal stopped");
                true
            }
            _ => false,
        };
        if turn.phase == TurnPhase::Revealing {
            turn.phase = TurnPhase::Idle;
        }
        stopped
    }

    /// Empty the log, stop any reveal, and orphan any in-flight request.
    pub fn clear(&self) {
        let mut turn = self.turn.lock().expect("turn lock poisoned");
        if let Some(active) = turn.reveal.take() {
            active.handle.cancel();
        }
        turn.epoch += 1;
        turn.phase = TurnPhase::Idle;
        self.store.clear();
        info!(conversation = %self.id, "conversation cleared");
    }

    /// The full log as `[timestamp] SENDER: text` lines.
    pub fn export_transcript(&self) -> String {
        transcript::render(&self.store.snapshot())
    }

    fn set_phase_if_current(&self, epoch: u64, phase: TurnPhase) {
        let mut turn = self.turn.lock().expect("turn lock poisoned");
        if turn.epoch == epoch {
            turn.phase = phase;
        }
    }

    /// Cancel the running reveal and write its full text into the last slot.
    fn fast_forward(&self, turn: &mut TurnSlot) {
        if let Some(active) = turn.reveal.take() {
            if active.handle.is_running() {
                active.handle.cancel();
                self.store
                    .replace_last(ChatMessage::bot(active.handle.full_text(), active.timestamp));
                debug!(conversation = %self.id, "previous reveal fast-forwarded");
            }
        }
        turn.phase = TurnPhase::Idle;
    }
}
