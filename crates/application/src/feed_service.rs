use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stewardlens_core::{AppError, AppResult};
use stewardlens_domain::{
    ChartBucket, FilterSpec, HeatmapCell, NetworkActivity, SummaryStats, UpdateRecord,
};

use crate::aggregator::{Aggregator, CHART_WINDOW_DAYS};
use crate::filter_engine::FilterEngine;
use crate::ports::UpdateFeed;

/// Everything one dashboard render needs, derived in a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Filtered update records, feed order preserved.
    pub updates: Vec<UpdateRecord>,
    /// Daily activity buckets over the filtered subset.
    pub chart: Vec<ChartBucket>,
    /// Asset-by-network cells over the filtered subset.
    pub heatmap: Vec<HeatmapCell>,
    /// Summary statistics over the filtered subset.
    pub stats: SummaryStats,
    /// Headline tallies over the full collection.
    pub activity: NetworkActivity,
}

/// Composes feed, filter engine, and aggregator into dashboard snapshots.
#[derive(Clone)]
pub struct FeedService {
    feed: Arc<dyn UpdateFeed>,
    engine: FilterEngine,
    aggregator: Aggregator,
}

impl FeedService {
    /// Creates a feed service over the given update source.
    #[must_use]
    pub fn new(feed: Arc<dyn UpdateFeed>) -> Self {
        Self {
            feed,
            engine: FilterEngine::new(),
            aggregator: Aggregator::new(),
        }
    }

    /// Pulls the collection once and derives a snapshot for `spec`.
    pub fn snapshot(&self, spec: &FilterSpec) -> AppResult<DashboardSnapshot> {
        self.snapshot_at(spec, Utc::now())
    }

    /// Deterministic variant of [`FeedService::snapshot`] with an explicit
    /// clock sample.
    pub fn snapshot_at(
        &self,
        spec: &FilterSpec,
        now: DateTime<Utc>,
    ) -> AppResult<DashboardSnapshot> {
        let records = self.feed.updates()?;
        ensure_unique_ids(&records)?;

        let updates = self.engine.apply_at(&records, spec, now);
        let chart = self
            .aggregator
            .bucket_by_day_at(&updates, CHART_WINDOW_DAYS, now);
        let heatmap = self.aggregator.bucket_by_asset_network(&updates);
        let stats = self.aggregator.summarize_at(&updates, now);
        let activity = self.aggregator.network_activity(&records);

        Ok(DashboardSnapshot {
            updates,
            chart,
            heatmap,
            stats,
            activity,
        })
    }
}

/// Record ids must be unique within a collection; a duplicate is a feed
/// defect surfaced at this boundary rather than inside the engine.
fn ensure_unique_ids(records: &[UpdateRecord]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id().as_str()) {
            return Err(AppError::Conflict(format!(
                "duplicate update record id '{}'",
                record.id().as_str()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use stewardlens_core::AppResult;
    use stewardlens_domain::{
        Asset, FilterSpec, Network, Outcome, ParameterKind, StewardKind, UpdateRecord,
    };

    use super::FeedService;
    use crate::aggregator::CHART_WINDOW_DAYS;
    use crate::ports::UpdateFeed;

    struct FakeFeed {
        records: Vec<UpdateRecord>,
    }

    impl UpdateFeed for FakeFeed {
        fn updates(&self) -> AppResult<Vec<UpdateRecord>> {
            Ok(self.records.clone())
        }
    }

    fn record(id: &str, symbol: &str, timestamp: DateTime<Utc>) -> UpdateRecord {
        UpdateRecord::new(
            id,
            timestamp,
            Network::new("ethereum", "Ethereum", 1, None).unwrap_or_else(|_| unreachable!()),
            Asset::new(symbol, symbol, None).unwrap_or_else(|_| unreachable!()),
            ParameterKind::BorrowCap,
            StewardKind::Automated,
            "1000000",
            "2000000",
            format!("0x{id}"),
            Outcome::Success,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn snapshot_filters_before_aggregating() {
        let now = Utc::now();
        let feed = FakeFeed {
            records: vec![
                record("a", "ETH", now),
                record("b", "USDC", now - Duration::hours(1)),
                record("c", "ETH", now - Duration::hours(2)),
            ],
        };
        let service = FeedService::new(Arc::new(feed));
        let spec = FilterSpec {
            assets: ["ETH".to_owned()].into_iter().collect(),
            ..FilterSpec::default()
        };

        let snapshot = service
            .snapshot_at(&spec, now)
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(snapshot.updates.len(), 2);
        assert_eq!(snapshot.stats.total_count, 2);
        assert_eq!(snapshot.chart.len(), CHART_WINDOW_DAYS);
        assert_eq!(snapshot.heatmap.len(), 1);
        assert_eq!(snapshot.heatmap[0].count, 2);
        // Headline tallies cover the unfiltered collection.
        assert_eq!(snapshot.activity.automated_count, 3);
    }

    #[test]
    fn snapshot_rejects_duplicate_record_ids() {
        let now = Utc::now();
        let feed = FakeFeed {
            records: vec![record("a", "ETH", now), record("a", "USDC", now)],
        };
        let service = FeedService::new(Arc::new(feed));

        let result = service.snapshot_at(&FilterSpec::default(), now);
        assert!(result.is_err());
    }
}
