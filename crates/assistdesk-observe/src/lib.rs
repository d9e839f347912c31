//! Observability for AssistDesk: tracing subscriber setup and shared span
//! field names.

pub mod fields;
pub mod tracing_setup;
