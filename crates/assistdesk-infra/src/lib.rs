//! Infrastructure layer for AssistDesk.
//!
//! reqwest clients for the three backend origins (general, patent chat,
//! process chat), the shared HTTP error mapping, and client configuration
//! loading.

pub mod backends;
pub mod config;
pub mod http;
pub mod main_api;
pub mod patent;
pub mod process;

#[cfg(test)]
mod testing;
