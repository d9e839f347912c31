//! Chat message lifecycle: the message store, the typing-reveal engine, the
//! backend port, and the controller that ties them together per turn.

pub mod backend;
pub mod controller;
pub mod reveal;
pub mod store;
pub mod transcript;

pub use backend::{BoxChatBackend, ChatBackend};
pub use controller::{ConversationController, RevealTicket, TurnOutcome, TurnPhase};
pub use reveal::{RevealEngine, RevealHandle, RevealStatus};
pub use store::{MessageStore, StoreEvent};
