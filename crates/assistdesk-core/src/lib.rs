//! Client-side logic for AssistDesk.
//!
//! The chat message lifecycle (store, typing reveal, conversation
//! controller), request-layer primitives (tag-invalidated caching, dual
//! backend fan-out), navigation state, and form validation. Backend clients
//! implement the ports defined here; this crate depends only on
//! `assistdesk-types` and tokio primitives, never on `assistdesk-infra` or
//! any HTTP crate.

pub mod chat;
pub mod forms;
pub mod nav;
pub mod request;
