//! Shared domain types for AssistDesk.
//!
//! Chat messages, remote resource rows, request/response bodies, navigation
//! sections, client configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod nav;
pub mod resource;
