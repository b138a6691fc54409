use chrono::{DateTime, Utc};
use stewardlens_domain::{FilterSpec, UpdateRecord};

/// Stateless, order-preserving filter over update collections.
///
/// Every clause of a [`FilterSpec`] is vacuously true when unset, so the
/// engine is total: there is no input it rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine;

impl FilterEngine {
    /// Creates a filter engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the subset of `records` matching `spec`, in input order.
    ///
    /// "Now" is sampled once for the whole pass so preset time windows are
    /// internally consistent across records.
    #[must_use]
    pub fn apply(&self, records: &[UpdateRecord], spec: &FilterSpec) -> Vec<UpdateRecord> {
        self.apply_at(records, spec, Utc::now())
    }

    /// Deterministic variant of [`FilterEngine::apply`] with an explicit
    /// clock sample.
    #[must_use]
    pub fn apply_at(
        &self,
        records: &[UpdateRecord],
        spec: &FilterSpec,
        now: DateTime<Utc>,
    ) -> Vec<UpdateRecord> {
        records
            .iter()
            .filter(|record| Self::matches_at(record, spec, now))
            .cloned()
            .collect()
    }

    /// Returns whether a single record passes every clause of `spec`.
    #[must_use]
    pub fn matches_at(record: &UpdateRecord, spec: &FilterSpec, now: DateTime<Utc>) -> bool {
        if !spec.networks.is_empty() && !spec.networks.contains(record.network().id().as_str()) {
            return false;
        }

        if !spec.assets.is_empty() && !spec.assets.contains(record.asset().symbol().as_str()) {
            return false;
        }

        if !spec.parameter_kinds.is_empty()
            && !spec.parameter_kinds.contains(&record.parameter_kind())
        {
            return false;
        }

        if !spec.steward.matches(record.steward_kind()) {
            return false;
        }

        if !spec.outcomes.is_empty() && !spec.outcomes.contains(&record.outcome()) {
            return false;
        }

        if !spec.window.contains(record.timestamp(), now) {
            return false;
        }

        let needle = spec.search.trim();
        if !needle.is_empty() && !Self::matches_search(record, needle) {
            return false;
        }

        true
    }

    fn matches_search(record: &UpdateRecord, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let candidates = [
            record.asset().symbol().as_str(),
            record.asset().display_name().as_str(),
            record.parameter_kind().as_str(),
            record.network().display_name().as_str(),
            record.transaction_ref().as_str(),
            record.old_value(),
            record.new_value(),
        ];

        candidates
            .iter()
            .any(|candidate| candidate.to_lowercase().contains(needle.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;
    use stewardlens_domain::{
        Asset, FilterSpec, Network, Outcome, ParameterKind, StewardFilter, StewardKind,
        TimeWindow, UpdateRecord,
    };

    use super::FilterEngine;

    fn network(id: &str, name: &str, chain_id: i64) -> Network {
        Network::new(id, name, chain_id, None).unwrap_or_else(|_| unreachable!())
    }

    fn asset(symbol: &str, name: &str) -> Asset {
        Asset::new(symbol, name, None).unwrap_or_else(|_| unreachable!())
    }

    fn record(
        id: &str,
        symbol: &str,
        timestamp: DateTime<Utc>,
        steward_kind: StewardKind,
        transaction_ref: &str,
    ) -> UpdateRecord {
        UpdateRecord::new(
            id,
            timestamp,
            network("ethereum", "Ethereum", 1),
            asset(symbol, symbol),
            ParameterKind::SupplyCap,
            steward_kind,
            "100",
            "200",
            transaction_ref,
            Outcome::Success,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn sample_collection(now: DateTime<Utc>) -> Vec<UpdateRecord> {
        let symbols = [
            "ETH", "USDC", "ETH", "DAI", "WBTC", "ETH", "USDT", "AAVE", "LINK", "UNI",
        ];
        symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| {
                record(
                    &format!("update-{index}"),
                    symbol,
                    now - Duration::hours(index as i64),
                    if index % 2 == 0 {
                        StewardKind::Manual
                    } else {
                        StewardKind::Automated
                    },
                    &format!("0xref{index}"),
                )
            })
            .collect()
    }

    #[test]
    fn empty_spec_returns_window_subset_in_order() {
        let now = Utc::now();
        let mut records = sample_collection(now);
        records.push(record(
            "update-old",
            "ETH",
            now - Duration::days(45),
            StewardKind::Manual,
            "0xold",
        ));

        let filtered = FilterEngine::new().apply_at(&records, &FilterSpec::default(), now);

        assert_eq!(filtered.len(), 10);
        for (left, right) in filtered.iter().zip(filtered.iter().skip(1)) {
            let left_position = records.iter().position(|r| r.id() == left.id());
            let right_position = records.iter().position(|r| r.id() == right.id());
            assert!(left_position < right_position);
        }
    }

    #[test]
    fn asset_clause_keeps_matching_records_in_relative_order() {
        let now = Utc::now();
        let records = sample_collection(now);
        let spec = FilterSpec {
            assets: ["ETH".to_owned()].into_iter().collect(),
            ..FilterSpec::default()
        };

        let filtered = FilterEngine::new().apply_at(&records, &spec, now);

        let ids: Vec<&str> = filtered.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["update-0", "update-2", "update-5"]);
    }

    #[test]
    fn search_matches_transaction_ref_case_insensitively() {
        let now = Utc::now();
        let mut records = sample_collection(now);
        records.push(record(
            "update-target",
            "ETH",
            now,
            StewardKind::Manual,
            "0xABCdef123",
        ));
        let spec = FilterSpec {
            search: "0xabc".to_owned(),
            ..FilterSpec::default()
        };

        let filtered = FilterEngine::new().apply_at(&records, &spec, now);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id().as_str(), "update-target");
    }

    #[test]
    fn search_matches_parameter_kind_label() {
        let now = Utc::now();
        let records = sample_collection(now);
        let spec = FilterSpec {
            search: "supply cap".to_owned(),
            ..FilterSpec::default()
        };

        let filtered = FilterEngine::new().apply_at(&records, &spec, now);
        assert_eq!(filtered.len(), records.len());
    }

    #[test]
    fn steward_clause_excludes_other_kind() {
        let now = Utc::now();
        let records = sample_collection(now);
        let spec = FilterSpec {
            steward: StewardFilter::Only(StewardKind::Manual),
            ..FilterSpec::default()
        };

        let filtered = FilterEngine::new().apply_at(&records, &spec, now);

        assert_eq!(filtered.len(), 5);
        assert!(
            filtered
                .iter()
                .all(|record| record.steward_kind() == StewardKind::Manual)
        );
    }

    #[test]
    fn custom_window_honors_open_bounds() {
        let now = Utc::now();
        let records = sample_collection(now);
        let spec = FilterSpec {
            window: TimeWindow::custom(None, Some(now - Duration::hours(5)))
                .unwrap_or_else(|_| unreachable!()),
            ..FilterSpec::default()
        };

        let filtered = FilterEngine::new().apply_at(&records, &spec, now);

        assert_eq!(filtered.len(), 5);
        assert!(
            filtered
                .iter()
                .all(|record| record.timestamp() <= now - Duration::hours(5))
        );
    }

    #[test]
    fn preset_window_uses_the_supplied_clock_sample() {
        let now = Utc::now();
        let records = vec![
            record("fresh", "ETH", now - Duration::hours(2), StewardKind::Manual, "0xa"),
            record("stale", "ETH", now - Duration::hours(30), StewardKind::Manual, "0xb"),
        ];
        let spec = FilterSpec {
            window: TimeWindow::Last24h,
            ..FilterSpec::default()
        };

        let filtered = FilterEngine::new().apply_at(&records, &spec, now);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id().as_str(), "fresh");
    }

    proptest! {
        #[test]
        fn apply_is_idempotent(
            picks in proptest::collection::vec(0usize..10, 0..24),
            filter_eth in proptest::bool::ANY,
            manual_only in proptest::bool::ANY,
            search in "[a-z0-9]{0,6}",
        ) {
            let now = Utc::now();
            let base = sample_collection(now);
            let records: Vec<_> = picks
                .iter()
                .map(|index| base[*index].clone())
                .collect();
            let spec = FilterSpec {
                assets: if filter_eth {
                    ["ETH".to_owned()].into_iter().collect()
                } else {
                    Default::default()
                },
                steward: if manual_only {
                    StewardFilter::Only(StewardKind::Manual)
                } else {
                    StewardFilter::All
                },
                search,
                ..FilterSpec::default()
            };

            let engine = FilterEngine::new();
            let once = engine.apply_at(&records, &spec, now);
            let twice = engine.apply_at(&once, &spec, now);
            prop_assert_eq!(once, twice);
        }
    }
}
