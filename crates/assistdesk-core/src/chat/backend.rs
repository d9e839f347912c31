//! ChatBackend port and its type-erased wrapper.
//!
//! Both chat modes speak the same contract: send a query, get back one
//! complete reply. Concrete clients live in assistdesk-infra. `BoxChatBackend`
//! follows the usual blanket-impl pattern so the CLI can pick a backend at
//! runtime:
//! 1. an object-safe `ChatBackendDyn` trait with boxed futures
//! 2. a blanket impl of `ChatBackendDyn` for every `T: ChatBackend`
//! 3. `BoxChatBackend` wraps `Box<dyn ChatBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use assistdesk_types::chat::ChatReply;
use assistdesk_types::error::RequestError;

/// A backend that answers chat queries with a single complete reply.
pub trait ChatBackend: Send + Sync {
    /// Short backend name for logs (e.g., "patent", "process").
    fn name(&self) -> &str;

    fn send_message(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<ChatReply, RequestError>> + Send;
}

/// Object-safe version of [`ChatBackend`].
pub trait ChatBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn send_message_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChatReply, RequestError>> + Send + 'a>>;
}

impl<T: ChatBackend> ChatBackendDyn for T {
    fn name(&self) -> &str {
        ChatBackend::name(self)
    }

    fn send_message_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChatReply, RequestError>> + Send + 'a>> {
        Box::pin(self.send_message(text))
    }
}

/// Type-erased chat backend for runtime mode selection.
pub struct BoxChatBackend {
    inner: Box<dyn ChatBackendDyn>,
}

impl BoxChatBackend {
    pub fn new<T: ChatBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Name of the wrapped backend.
    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl ChatBackend for BoxChatBackend {
    fn name(&self) -> &str {
        BoxChatBackend::name(self)
    }

    async fn send_message(&self, text: &str) -> Result<ChatReply, RequestError> {
        self.inner.send_message_boxed(text).await
    }
}
