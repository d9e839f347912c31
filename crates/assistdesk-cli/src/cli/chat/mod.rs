//! Interactive chat for AssistDesk.
//!
//! The conversation controller drives the message store; `view` turns store
//! events into terminal output so the typing reveal shows up character by
//! character above the input prompt. Entry points: `loop_runner::run_chat_loop`
//! for the interactive session and `ask::ask_once` for one-shot questions.

pub mod ask;
pub mod banner;
pub mod clipboard;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod view;
