use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stewardlens_core::{AppError, AppResult};

use crate::update::{Outcome, ParameterKind, StewardKind};

/// Time window an update must fall into to pass filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Trailing 24 hours.
    Last24h,
    /// Trailing 7 days.
    Last7d,
    /// Trailing 30 days.
    #[default]
    Last30d,
    /// Explicit date range; either bound may be open.
    Custom {
        /// Inclusive lower bound.
        start: Option<DateTime<Utc>>,
        /// Inclusive upper bound.
        end: Option<DateTime<Utc>>,
    },
}

impl TimeWindow {
    /// Creates a validated custom window.
    pub fn custom(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> AppResult<Self> {
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(AppError::Validation(
                "custom time window start must not be after end".to_owned(),
            ));
        }

        Ok(Self::Custom { start, end })
    }

    /// Returns whether a timestamp falls inside the window.
    ///
    /// Preset windows are anchored at `now`, which callers sample once per
    /// filtering pass so a single pass is internally consistent.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Custom { start, end } => {
                if start.is_some_and(|start| timestamp < start) {
                    return false;
                }
                if end.is_some_and(|end| timestamp > end) {
                    return false;
                }
                true
            }
            Self::Last24h => timestamp >= now - Duration::hours(24),
            Self::Last7d => timestamp >= now - Duration::days(7),
            Self::Last30d => timestamp >= now - Duration::days(30),
        }
    }
}

/// Steward-kind restriction; `All` imposes none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StewardFilter {
    /// Either steward kind passes.
    #[default]
    All,
    /// Only the given steward kind passes.
    Only(StewardKind),
}

impl StewardFilter {
    /// Returns whether the given steward kind passes the restriction.
    #[must_use]
    pub fn matches(&self, kind: StewardKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == kind,
        }
    }
}

/// One of the seven filter clauses, named for selective clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// Network id restriction.
    Networks,
    /// Asset symbol restriction.
    Assets,
    /// Parameter kind restriction.
    ParameterKinds,
    /// Steward kind restriction.
    Steward,
    /// Time window restriction.
    Window,
    /// Outcome restriction.
    Outcomes,
    /// Free-text search restriction.
    Search,
}

/// Caller-owned filter specification over an update collection.
///
/// Empty constraint sets impose no restriction; there is no invalid state.
/// The spec is mutated in place by its owning view and discarded with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Network ids to include; empty means all networks.
    pub networks: HashSet<String>,
    /// Asset symbols to include; empty means all assets.
    pub assets: HashSet<String>,
    /// Parameter kinds to include; empty means all kinds.
    pub parameter_kinds: HashSet<ParameterKind>,
    /// Steward kind restriction.
    pub steward: StewardFilter,
    /// Time window restriction; defaults to the trailing 30 days.
    pub window: TimeWindow,
    /// Outcomes to include; empty means all outcomes.
    pub outcomes: HashSet<Outcome>,
    /// Case-insensitive free-text search; blank means no restriction.
    pub search: String,
}

impl FilterSpec {
    /// Returns the number of clauses in a non-default state.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let active = [
            !self.networks.is_empty(),
            !self.assets.is_empty(),
            !self.parameter_kinds.is_empty(),
            self.steward != StewardFilter::All,
            self.window != TimeWindow::Last30d,
            !self.outcomes.is_empty(),
            !self.search.trim().is_empty(),
        ];
        active.into_iter().filter(|flag| *flag).count()
    }

    /// Returns whether any clause is in a non-default state.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.active_count() > 0
    }

    /// Resets every clause to its default.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Resets exactly one clause to its default, leaving the rest untouched.
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Networks => self.networks.clear(),
            FilterField::Assets => self.assets.clear(),
            FilterField::ParameterKinds => self.parameter_kinds.clear(),
            FilterField::Steward => self.steward = StewardFilter::All,
            FilterField::Window => self.window = TimeWindow::default(),
            FilterField::Outcomes => self.outcomes.clear(),
            FilterField::Search => self.search.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use super::{FilterField, FilterSpec, StewardFilter, TimeWindow};
    use crate::update::StewardKind;

    #[test]
    fn default_spec_has_no_active_filters() {
        let spec = FilterSpec::default();
        assert_eq!(spec.active_count(), 0);
        assert!(!spec.has_active_filters());
    }

    #[test]
    fn custom_window_rejects_inverted_bounds() {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).single();
        let end = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).single();
        assert!(TimeWindow::custom(start, end).is_err());
    }

    #[test]
    fn custom_window_without_bounds_passes_everything() {
        let window =
            TimeWindow::custom(None, None).unwrap_or_else(|_| unreachable!());
        let now = Utc::now();
        assert!(window.contains(now - chrono::Duration::days(900), now));
    }

    #[test]
    fn custom_window_counts_as_active_even_without_bounds() {
        let spec = FilterSpec {
            window: TimeWindow::custom(None, None).unwrap_or_else(|_| unreachable!()),
            ..FilterSpec::default()
        };
        assert_eq!(spec.active_count(), 1);
    }

    #[test]
    fn blank_search_is_not_active() {
        let spec = FilterSpec {
            search: "   ".to_owned(),
            ..FilterSpec::default()
        };
        assert_eq!(spec.active_count(), 0);
    }

    #[test]
    fn clear_resets_only_the_named_field() {
        let mut spec = FilterSpec {
            steward: StewardFilter::Only(StewardKind::Manual),
            ..FilterSpec::default()
        };
        spec.assets.insert("ETH".to_owned());
        assert_eq!(spec.active_count(), 2);

        spec.clear(FilterField::Assets);
        assert!(spec.assets.is_empty());
        assert_eq!(spec.steward, StewardFilter::Only(StewardKind::Manual));
        assert_eq!(spec.active_count(), 1);
    }

    proptest! {
        #[test]
        fn clear_all_always_returns_to_the_default(
            networks in proptest::collection::hash_set("[a-z]{1,8}", 0..4),
            assets in proptest::collection::hash_set("[A-Z]{2,5}", 0..4),
            search in "[ -~]{0,16}",
            manual in proptest::bool::ANY,
        ) {
            let mut spec = FilterSpec {
                networks,
                assets,
                search,
                steward: if manual {
                    StewardFilter::Only(StewardKind::Manual)
                } else {
                    StewardFilter::All
                },
                ..FilterSpec::default()
            };
            spec.clear_all();
            prop_assert_eq!(spec.active_count(), 0);
            prop_assert_eq!(spec, FilterSpec::default());
        }
    }
}
