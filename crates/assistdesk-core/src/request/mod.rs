//! Request-layer primitives shared by the backend clients.

pub mod cache;
pub mod fanout;

pub use cache::{CachedQuery, ResourceTag, TagRegistry};
pub use fanout::{join_both, FanOut, Leg};
