//! StewardLens snapshot composition root.
//!
//! Generates the synthetic update feed, applies the environment-provided
//! filter specification, and prints the derived dashboard snapshot as JSON
//! on stdout.

#![forbid(unsafe_code)]

mod dto;
mod snapshot_config;

use std::sync::Arc;

use stewardlens_application::FeedService;
use stewardlens_core::{AppError, AppResult};
use stewardlens_infrastructure::{SyntheticFeedConfig, SyntheticUpdateFeed};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dto::SnapshotResponse;
use crate::snapshot_config::SnapshotConfig;

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SnapshotConfig::load()?;
    let feed = SyntheticUpdateFeed::new(SyntheticFeedConfig {
        record_count: config.record_count,
        window_days: config.window_days,
        seed: config.seed,
    });
    let service = FeedService::new(Arc::new(feed));

    info!(
        record_count = config.record_count,
        active_filters = config.filter.active_count(),
        "deriving dashboard snapshot"
    );

    let snapshot = service.snapshot(&config.filter)?;
    let response = SnapshotResponse::new(snapshot, &config.filter);

    info!(
        snapshot_id = %response.snapshot_id,
        matched = response.updates.len(),
        "snapshot ready"
    );

    println!("{}", serialize(&response, config.pretty)?);
    Ok(())
}

fn serialize(response: &SnapshotResponse, pretty: bool) -> AppResult<String> {
    let serialized = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };

    serialized.map_err(|error| AppError::Internal(format!("failed to serialize snapshot: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
