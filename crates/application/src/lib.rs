//! Application services and ports.

#![forbid(unsafe_code)]

mod aggregator;
mod feed_service;
mod filter_engine;
mod ports;

pub use aggregator::{Aggregator, CHART_WINDOW_DAYS};
pub use feed_service::{DashboardSnapshot, FeedService};
pub use filter_engine::FilterEngine;
pub use ports::UpdateFeed;
