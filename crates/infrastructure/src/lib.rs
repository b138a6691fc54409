//! Concrete update-feed adapters.

#![forbid(unsafe_code)]

mod in_memory_update_feed;
mod synthetic_update_feed;

pub use in_memory_update_feed::InMemoryUpdateFeed;
pub use synthetic_update_feed::{SyntheticFeedConfig, SyntheticUpdateFeed};
