//! Typing-reveal engine.
//!
//! Given a complete reply, the engine hands increasingly long prefixes of it
//! to a callback on a fixed tick, which makes a finished response look like
//! it is being streamed. Each reveal runs as its own spawned task and is
//! owned through a [`RevealHandle`]:
//!
//! - the cursor starts at 0 and advances one character per tick, so a reply
//!   of N characters produces N + 1 emissions of lengths `0..=N`;
//! - the task stops by itself after emitting the full text;
//! - [`RevealHandle::cancel`] stops it early. Emission happens while the
//!   session lock is held, so once `cancel` returns no further callback
//!   can start;
//! - dropping the handle cancels the session, so an orphaned tick source
//!   cannot outlive its owner.
//!
//! Prefixes are cut on `char` boundaries; a code point is never split.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default interval between ticks.
pub const DEFAULT_TICK: Duration = Duration::from_millis(3);

/// Errors from configuring the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    #[error("reveal tick interval must be greater than zero")]
    InvalidInterval,
}

/// Lifecycle of a reveal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    Running,
    /// The full text was emitted.
    Completed,
    /// Stopped before the full text was emitted.
    Cancelled,
}

/// Starts reveal sessions at a fixed tick interval.
#[derive(Debug, Clone, Copy)]
pub struct RevealEngine {
    tick: Duration,
}

impl RevealEngine {
    pub fn new(tick: Duration) -> Result<Self, RevealError> {
        if tick.is_zero() {
            return Err(RevealError::InvalidInterval);
        }
        Ok(Self { tick })
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Start revealing `full_text` through `on_tick`.
    ///
    /// Returns `None` without spawning anything when the text is empty.
    /// Must be called from within a Tokio runtime. `on_tick` must not call
    /// back into the returned handle.
    pub fn start<F>(&self, full_text: impl Into<String>, on_tick: F) -> Option<RevealHandle>
    where
        F: FnMut(&str) + Send + 'static,
    {
        let full_text = full_text.into();
        if full_text.is_empty() {
            return None;
        }

        // Byte offsets of every char-count prefix: boundaries[k] ends the k-char prefix.
        let mut boundaries: Vec<usize> = Vec::with_capacity(full_text.len() + 1);
        boundaries.push(0);
        boundaries.extend(full_text.char_indices().skip(1).map(|(i, _)| i));
        boundaries.push(full_text.len());

        let (status_tx, _) = watch::channel(RevealStatus::Running);
        let shared = Arc::new(RevealShared {
            session: Mutex::new(RevealSession {
                full_text,
                boundaries,
                cursor: 0,
                status: RevealStatus::Running,
            }),
            token: CancellationToken::new(),
            status_tx,
        });

        tokio::spawn(run_session(Arc::clone(&shared), self.tick, on_tick));

        Some(RevealHandle { shared })
    }
}

impl Default for RevealEngine {
    fn default() -> Self {
        Self { tick: DEFAULT_TICK }
    }
}

struct RevealSession {
    full_text: String,
    boundaries: Vec<usize>,
    /// Index into `boundaries` of the next prefix to emit.
    cursor: usize,
    status: RevealStatus,
}

struct RevealShared {
    session: Mutex<RevealSession>,
    token: CancellationToken,
    status_tx: watch::Sender<RevealStatus>,
}

async fn run_session<F>(shared: Arc<RevealShared>, tick: Duration, mut on_tick: F)
where
    F: FnMut(&str) + Send + 'static,
{
    let mut interval = tokio::time::interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shared.token.cancelled() => break,
            _ = interval.tick() => {
                let mut session = shared.session.lock().expect("reveal session lock poisoned");
                if session.status != RevealStatus::Running {
                    break;
                }

                let end = session.boundaries[session.cursor];
                on_tick(&session.full_text[..end]);
                session.cursor += 1;

                if session.cursor == session.boundaries.len() {
                    session.status = RevealStatus::Completed;
                    shared.status_tx.send_replace(RevealStatus::Completed);
                    debug!(chars = session.boundaries.len() - 1, "reveal completed");
                    break;
                }
            }
        }
    }
}

/// Owning handle for a running reveal session.
pub struct RevealHandle {
    shared: Arc<RevealShared>,
}

impl RevealHandle {
    /// Stop the session. Idempotent; a no-op after natural completion.
    pub fn cancel(&self) {
        {
            let mut session = self.shared.session.lock().expect("reveal session lock poisoned");
            if session.status == RevealStatus::Running {
                session.status = RevealStatus::Cancelled;
                self.shared.status_tx.send_replace(RevealStatus::Cancelled);
                debug!(revealed = session.cursor.saturating_sub(1), "reveal cancelled");
            }
        }
        self.shared.token.cancel();
    }

    pub fn status(&self) -> RevealStatus {
        *self.shared.status_tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.status() == RevealStatus::Running
    }

    /// Length in characters of the longest prefix emitted so far.
    pub fn revealed(&self) -> usize {
        let session = self.shared.session.lock().expect("reveal session lock poisoned");
        session.cursor.saturating_sub(1)
    }

    /// The complete text being revealed.
    pub fn full_text(&self) -> String {
        self.shared
            .session
            .lock()
            .expect("reveal session lock poisoned")
            .full_text
            .clone()
    }

    /// Watch the session status without holding the handle.
    pub fn subscribe_status(&self) -> watch::Receiver<RevealStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Wait until the session completes or is cancelled.
    pub async fn wait(&self) -> RevealStatus {
        wait_finished(self.subscribe_status()).await
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for RevealHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealHandle")
            .field("status", &self.status())
            .finish()
    }
}

/// Resolve once a status receiver leaves `Running`.
pub async fn wait_finished(mut rx: watch::Receiver<RevealStatus>) -> RevealStatus {
    let done = match rx.wait_for(|status| *status != RevealStatus::Running).await {
        Ok(status) => Some(*status),
        Err(_) => None,
    };
    done.unwrap_or_else(|| *rx.borrow())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&str) + Send + 'static) {
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&emitted);
        (emitted, move |prefix: &str| sink.lock().unwrap().push(prefix.to_string()))
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(RevealEngine::new(Duration::ZERO).unwrap_err(), RevealError::InvalidInterval);
        assert!(RevealEngine::new(Duration::from_millis(1)).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_starts_nothing() {
        let (emitted, on_tick) = recorder();
        let handle = RevealEngine::default().start("", on_tick);
        assert!(handle.is_none());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(emitted.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn emits_every_prefix_then_completes() {
        let (emitted, on_tick) = recorder();
        let handle = RevealEngine::default().start("hi there", on_tick).unwrap();

        assert_eq!(handle.wait().await, RevealStatus::Completed);

        let emitted = emitted.lock().unwrap().clone();
        assert_eq!(emitted.len(), "hi there".len() + 1);
        assert_eq!(emitted.first().unwrap(), "");
        assert_eq!(emitted.last().unwrap(), "hi there");
        for pair in emitted.windows(2) {
            assert!(pair[1].len() > pair[0].len());
            assert!("hi there".starts_with(pair[1].as_str()));
        }
        assert_eq!(handle.revealed(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn prefixes_respect_char_boundaries() {
        let (emitted, on_tick) = recorder();
        let text = "héllo ✓";
        let handle = RevealEngine::default().start(text, on_tick).unwrap();
        handle.wait().await;

        let emitted = emitted.lock().unwrap().clone();
        assert_eq!(emitted.len(), text.chars().count() + 1);
        assert_eq!(emitted[2], "hé");
        assert_eq!(emitted.last().unwrap(), text);
    }

    #[tokio::test(start_paused = true)]
    async fn no_emission_after_cancel() {
        let (emitted, on_tick) = recorder();
        let tick = Duration::from_millis(10);
        let engine = RevealEngine::new(tick).unwrap();
        let handle = engine.start("a fairly long reply to reveal", on_tick).unwrap();

        tokio::time::sleep(tick * 4 + tick / 2).await;
        handle.cancel();
        let at_cancel = emitted.lock().unwrap().len();
        assert!(at_cancel > 0);
        assert!(at_cancel < "a fairly long reply to reveal".len() + 1);
        assert_eq!(handle.status(), RevealStatus::Cancelled);

        tokio::time::sleep(tick * 100).await;
        assert_eq!(emitted.lock().unwrap().len(), at_cancel);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent_and_safe_after_completion() {
        let (_emitted, on_tick) = recorder();
        let handle = RevealEngine::default().start("ok", on_tick).unwrap();
        assert_eq!(handle.wait().await, RevealStatus::Completed);

        handle.cancel();
        handle.cancel();
        assert_eq!(handle.status(), RevealStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_ticks() {
        let (emitted, on_tick) = recorder();
        let handle = RevealEngine::default().start("dropped early", on_tick).unwrap();
        let status = handle.subscribe_status();
        drop(handle);

        assert_eq!(wait_finished(status).await, RevealStatus::Cancelled);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wait_returns_last_status_when_sender_is_gone() {
        let (tx, rx) = watch::channel(RevealStatus::Running);
        drop(tx);
        assert_eq!(wait_finished(rx).await, RevealStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_resolves_on_completion() {
        let (_, on_tick) = recorder();
        let handle = RevealEngine::default().start("ok", on_tick).unwrap();
        assert_eq!(handle.wait().await, RevealStatus::Completed);
        assert_eq!(handle.wait().await, RevealStatus::Completed);
    }
}
