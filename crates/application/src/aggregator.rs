use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use stewardlens_domain::{
    ActivityLeader, ChartBucket, HeatmapCell, NetworkActivity, Outcome, RiskLevel, StewardKind,
    SummaryStats, UpdateRecord,
};

/// Number of calendar-day buckets the dashboard activity chart spans.
pub const CHART_WINDOW_DAYS: usize = 30;

/// Pure derivations of chart-ready aggregates from an update collection.
///
/// Each derivation is total: empty input produces empty or zero-valued
/// output, never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Creates an aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Buckets records into one [`ChartBucket`] per calendar day for the
    /// trailing `window_days` days ending today.
    #[must_use]
    pub fn bucket_by_day(&self, records: &[UpdateRecord], window_days: usize) -> Vec<ChartBucket> {
        self.bucket_by_day_at(records, window_days, Utc::now())
    }

    /// Deterministic variant of [`Aggregator::bucket_by_day`] with an
    /// explicit clock sample.
    ///
    /// Always returns exactly `window_days` buckets, oldest first; records
    /// outside the window are dropped silently.
    #[must_use]
    pub fn bucket_by_day_at(
        &self,
        records: &[UpdateRecord],
        window_days: usize,
        now: DateTime<Utc>,
    ) -> Vec<ChartBucket> {
        let today = now.date_naive();
        let mut buckets: Vec<ChartBucket> = (0..window_days)
            .rev()
            .map(|offset| ChartBucket::empty(today - Duration::days(offset as i64)))
            .collect();

        for record in records {
            let age = (today - record.timestamp().date_naive()).num_days();
            if age < 0 || age >= window_days as i64 {
                continue;
            }

            let index = (window_days as i64 - 1 - age) as usize;
            buckets[index].total_count += 1;
            match record.steward_kind() {
                StewardKind::Manual => buckets[index].manual_count += 1,
                StewardKind::Automated => buckets[index].automated_count += 1,
            }
        }

        buckets
    }

    /// Groups records by (asset symbol, network display name), counting
    /// updates and tracking the most recent timestamp per pair.
    ///
    /// Cells come back in first-seen order; consumers sort at presentation
    /// time.
    #[must_use]
    pub fn bucket_by_asset_network(&self, records: &[UpdateRecord]) -> Vec<HeatmapCell> {
        let mut cells: Vec<HeatmapCell> = Vec::new();
        let mut index_by_pair: HashMap<(String, String), usize> = HashMap::new();

        for record in records {
            let pair = (
                record.asset().symbol().as_str().to_owned(),
                record.network().display_name().as_str().to_owned(),
            );

            match index_by_pair.get(&pair) {
                Some(&index) => {
                    cells[index].count += 1;
                    if record.timestamp() > cells[index].last_update {
                        cells[index].last_update = record.timestamp();
                    }
                }
                None => {
                    index_by_pair.insert(pair.clone(), cells.len());
                    cells.push(HeatmapCell {
                        asset: pair.0,
                        network: pair.1,
                        count: 1,
                        last_update: record.timestamp(),
                    });
                }
            }
        }

        cells
    }

    /// Derives summary statistics over the collection.
    #[must_use]
    pub fn summarize(&self, records: &[UpdateRecord]) -> SummaryStats {
        self.summarize_at(records, Utc::now())
    }

    /// Deterministic variant of [`Aggregator::summarize`] with an explicit
    /// clock sample.
    #[must_use]
    pub fn summarize_at(&self, records: &[UpdateRecord], now: DateTime<Utc>) -> SummaryStats {
        let total_count = records.len();
        let today = now.date_naive();
        let count_today = records
            .iter()
            .filter(|record| record.timestamp().date_naive() == today)
            .count();

        let most_active_asset =
            most_active(records.iter().map(|record| record.asset().symbol().as_str()));
        let most_active_network = most_active(
            records
                .iter()
                .map(|record| record.network().display_name().as_str()),
        );

        let success_count = records
            .iter()
            .filter(|record| record.outcome() == Outcome::Success)
            .count();
        let automated_count = records
            .iter()
            .filter(|record| record.steward_kind() == StewardKind::Automated)
            .count();
        let critical_count = records
            .iter()
            .filter(|record| {
                record
                    .impact()
                    .is_some_and(|impact| impact.risk_level() == RiskLevel::Critical)
            })
            .count();

        SummaryStats {
            total_count,
            count_today,
            most_active_asset,
            most_active_network,
            mean_interval_hours: mean_interval_hours(records),
            success_rate_percent: percentage(success_count, total_count),
            automation_rate_percent: percentage(automated_count, total_count),
            critical_count,
        }
    }

    /// Tallies headline activity numbers over the full collection.
    #[must_use]
    pub fn network_activity(&self, records: &[UpdateRecord]) -> NetworkActivity {
        let active_networks = records
            .iter()
            .map(|record| record.network().id().as_str())
            .collect::<HashSet<_>>()
            .len();

        NetworkActivity {
            active_networks,
            manual_count: records
                .iter()
                .filter(|record| record.steward_kind() == StewardKind::Manual)
                .count(),
            automated_count: records
                .iter()
                .filter(|record| record.steward_kind() == StewardKind::Automated)
                .count(),
            success_count: records
                .iter()
                .filter(|record| record.outcome() == Outcome::Success)
                .count(),
            failed_count: records
                .iter()
                .filter(|record| record.outcome() == Outcome::Failed)
                .count(),
        }
    }
}

/// Argmax over group counts with a first-encountered tie-break.
///
/// Labels are scanned left to right; the count map is only consulted, never
/// iterated, so the tie-break does not depend on hash order.
fn most_active<'a>(labels: impl Iterator<Item = &'a str>) -> Option<ActivityLeader> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for label in labels {
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            first_seen.push(label);
        }
        *count += 1;
    }

    let mut leader: Option<ActivityLeader> = None;
    for label in first_seen {
        let count = counts.get(label).copied().unwrap_or(0);
        if leader.as_ref().is_none_or(|best| count > best.count) {
            leader = Some(ActivityLeader {
                label: label.to_owned(),
                count,
            });
        }
    }

    leader
}

/// Mean hours between consecutive updates; 0 when fewer than two records.
fn mean_interval_hours(records: &[UpdateRecord]) -> f64 {
    if records.len() < 2 {
        return 0.0;
    }

    let mut timestamps: Vec<DateTime<Utc>> = records.iter().map(UpdateRecord::timestamp).collect();
    timestamps.sort();

    let total_seconds: i64 = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds())
        .sum();

    total_seconds as f64 / (timestamps.len() - 1) as f64 / 3600.0
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    part as f64 / total as f64 * 100.0
}
