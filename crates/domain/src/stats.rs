use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One calendar-day bucket of update activity, chart-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBucket {
    /// Calendar day (UTC) the bucket covers.
    pub date: NaiveDate,
    /// Updates landing on that day.
    pub total_count: usize,
    /// Manually initiated updates.
    pub manual_count: usize,
    /// Automated updates.
    pub automated_count: usize,
}

impl ChartBucket {
    /// Creates an empty bucket for the given day.
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_count: 0,
            manual_count: 0,
            automated_count: 0,
        }
    }
}

/// Aggregate update count for one (asset, network) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    /// Asset ticker symbol.
    pub asset: String,
    /// Network display name.
    pub network: String,
    /// Updates observed for the pair.
    pub count: usize,
    /// Most recent update timestamp for the pair.
    pub last_update: DateTime<Utc>,
}

/// Argmax result over group counts: the busiest asset or network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLeader {
    /// Group label (asset symbol or network display name).
    pub label: String,
    /// Updates counted for the group.
    pub count: usize,
}

/// Summary statistics over a (typically filtered) update collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Total records in the collection.
    pub total_count: usize,
    /// Records whose calendar day is the current day.
    pub count_today: usize,
    /// Busiest asset, absent for an empty collection.
    pub most_active_asset: Option<ActivityLeader>,
    /// Busiest network, absent for an empty collection.
    pub most_active_network: Option<ActivityLeader>,
    /// Mean hours between consecutive updates; 0 when fewer than two.
    pub mean_interval_hours: f64,
    /// Share of successful updates, 0–100; 0 for an empty collection.
    pub success_rate_percent: f64,
    /// Share of automated updates, 0–100; 0 for an empty collection.
    pub automation_rate_percent: f64,
    /// Records assessed at critical risk.
    pub critical_count: usize,
}

/// Headline activity tallies over the full (unfiltered) collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkActivity {
    /// Distinct networks with at least one update.
    pub active_networks: usize,
    /// Manually initiated updates.
    pub manual_count: usize,
    /// Automated updates.
    pub automated_count: usize,
    /// Successful updates.
    pub success_count: usize,
    /// Failed updates.
    pub failed_count: usize,
}
