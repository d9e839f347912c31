//! In-memory message log for a single conversation.
//!
//! `MessageStore` is the one mutable resource shared between the
//! conversation controller (and the reveal ticks it starts) and the view.
//! Every mutation is published as a [`StoreEvent`] on a broadcast channel
//! while the store lock is still held, so subscribers observe mutations in
//! exactly the order they were applied.

use std::sync::Mutex;

use assistdesk_types::chat::ChatMessage;
use tokio::sync::broadcast;

/// Default broadcast capacity. A long reveal emits one event per character,
/// so this is sized well above typical reply lengths.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// A single mutation of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Appended(ChatMessage),
    LastReplaced(ChatMessage),
    Cleared,
}

/// Ordered, append-mostly log of chat turns.
pub struct MessageStore {
    messages: Mutex<Vec<ChatMessage>>,
    events: broadcast::Sender<StoreEvent>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a store whose event channel buffers `capacity` events per
    /// subscriber before lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            messages: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Receive every future mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn append(&self, message: ChatMessage) {
        let mut messages = self.messages.lock().expect("message store lock poisoned");
        messages.push(message.clone());
        let _ = self.events.send(StoreEvent::Appended(message));
    }

    /// Replace the most recent message.
    ///
    /// On an empty log this appends, so the operation is total.
    pub fn replace_last(&self, message: ChatMessage) {
        let mut messages = self.messages.lock().expect("message store lock poisoned");
        match messages.last_mut() {
            Some(last) => {
                *last = message.clone();
                let _ = self.events.send(StoreEvent::LastReplaced(message));
            }
            None => {
                messages.push(message.clone());
                let _ = self.events.send(StoreEvent::Appended(message));
            }
        }
    }

    pub fn clear(&self) {
        let mut messages = self.messages.lock().expect("message store lock poisoned");
        messages.clear();
        let _ = self.events.send(StoreEvent::Cleared);
    }

    /// Copy of the current log, oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.lock().expect("message store lock poisoned").clone()
    }

    pub fn last(&self) -> Option<ChatMessage> {
        self.messages
            .lock()
            .expect("message store lock poisoned")
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().expect("message store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStore")
            .field("len", &self.len())
            .field("receiver_count", &self.events.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_snapshot_preserve_order() {
        let store = MessageStore::new();
        store.append(ChatMessage::user("one", "1:00:00 PM"));
        store.append(ChatMessage::bot("two", "1:00:01 PM"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text, "one");
        assert_eq!(snapshot[1].text, "two");
    }

    #[test]
    fn replace_last_only_touches_final_message() {
        let store = MessageStore::new();
        store.append(ChatMessage::user("hello", "1:00:00 PM"));
        store.append(ChatMessage::placeholder());
        store.replace_last(ChatMessage::bot("hi", ""));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text, "hello");
        assert_eq!(snapshot[1].text, "hi");
    }

    #[test]
    fn replace_last_on_empty_store_appends() {
        let store = MessageStore::new();
        store.replace_last(ChatMessage::bot("orphan", ""));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_log() {
        let store = MessageStore::new();
        store.append(ChatMessage::user("hello", ""));
        store.clear();
        assert!(store.is_empty());
        assert!(store.last().is_none());
    }

    #[test]
    fn every_mutation_is_published_in_order() {
        let store = MessageStore::new();
        let mut rx = store.subscribe();

        store.append(ChatMessage::user("hello", ""));
        store.replace_last(ChatMessage::user("hello!", ""));
        store.clear();

        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::Appended(m) if m.text == "hello"));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::LastReplaced(m) if m.text == "hello!"));
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::Cleared);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn mutations_without_subscribers_do_not_panic() {
        let store = MessageStore::with_capacity(1);
        for i in 0..10 {
            store.append(ChatMessage::user(format!("m{i}"), ""));
        }
        assert_eq!(store.len(), 10);
    }
}
