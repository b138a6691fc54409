use std::collections::HashSet;
use std::env;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stewardlens_core::{AppError, AppResult};
use stewardlens_domain::{FilterSpec, Outcome, ParameterKind, StewardFilter, StewardKind, TimeWindow};

/// Runtime configuration for one snapshot run.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub record_count: usize,
    pub window_days: u32,
    pub seed: Option<u64>,
    pub pretty: bool,
    pub filter: FilterSpec,
}

impl SnapshotConfig {
    /// Loads configuration from the environment.
    pub fn load() -> AppResult<Self> {
        let record_count = env::var("FEED_RECORD_COUNT")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(75);
        let window_days = env::var("FEED_WINDOW_DAYS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(30);

        let seed = env::var("FEED_SEED")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value.trim().parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid FEED_SEED: {error}"))
                })
            })
            .transpose()?;

        let pretty = env::var("SNAPSHOT_PRETTY")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            record_count,
            window_days,
            seed,
            pretty,
            filter: load_filter_spec()?,
        })
    }
}

/// Builds the filter specification from `FILTER_*` environment variables,
/// mirroring the query-parameter scheme of the dashboard frontend.
fn load_filter_spec() -> AppResult<FilterSpec> {
    let parameter_kinds = csv_values(env::var("FILTER_PARAMETERS").unwrap_or_default().as_str())
        .iter()
        .map(|value| ParameterKind::from_str(value))
        .collect::<AppResult<HashSet<_>>>()?;
    let outcomes = csv_values(env::var("FILTER_OUTCOMES").unwrap_or_default().as_str())
        .iter()
        .map(|value| Outcome::from_str(value))
        .collect::<AppResult<HashSet<_>>>()?;

    Ok(FilterSpec {
        networks: csv_values(env::var("FILTER_NETWORKS").unwrap_or_default().as_str())
            .into_iter()
            .collect(),
        assets: csv_values(env::var("FILTER_ASSETS").unwrap_or_default().as_str())
            .into_iter()
            .collect(),
        parameter_kinds,
        steward: parse_steward_filter(env::var("FILTER_STEWARD").unwrap_or_default().as_str())?,
        window: parse_time_window(env::var("FILTER_WINDOW").unwrap_or_default().as_str())?,
        outcomes,
        search: env::var("FILTER_SEARCH").unwrap_or_default(),
    })
}

fn csv_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_steward_filter(raw: &str) -> AppResult<StewardFilter> {
    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "" | "all" => Ok(StewardFilter::All),
        "manual" => Ok(StewardFilter::Only(StewardKind::Manual)),
        "automated" => Ok(StewardFilter::Only(StewardKind::Automated)),
        other => Err(AppError::Validation(format!(
            "unknown steward filter '{other}'"
        ))),
    }
}

/// Accepts `24h`, `7d`, `30d`, or `custom:<start>:<end>` with `YYYY-MM-DD`
/// day bounds, either of which may be empty for an open range.
fn parse_time_window(raw: &str) -> AppResult<TimeWindow> {
    match raw.trim() {
        "" | "30d" => Ok(TimeWindow::Last30d),
        "24h" => Ok(TimeWindow::Last24h),
        "7d" => Ok(TimeWindow::Last7d),
        custom if custom.starts_with("custom:") => {
            let mut parts = custom.splitn(3, ':');
            parts.next();
            let start = parse_day_bound(parts.next().unwrap_or_default())?;
            let end = parse_day_bound(parts.next().unwrap_or_default())?;
            TimeWindow::custom(start, end)
        }
        other => Err(AppError::Validation(format!(
            "unknown time window '{other}'"
        ))),
    }
}

fn parse_day_bound(raw: &str) -> AppResult<Option<DateTime<Utc>>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|error| {
        AppError::Validation(format!("invalid time window date '{raw}': {error}"))
    })?;

    Ok(date
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive)))
}

#[cfg(test)]
mod tests {
    use stewardlens_domain::{StewardFilter, StewardKind, TimeWindow};

    use super::{csv_values, parse_steward_filter, parse_time_window};

    #[test]
    fn csv_values_trims_and_drops_empties() {
        assert_eq!(
            csv_values("ethereum, base,,polygon "),
            vec!["ethereum", "base", "polygon"]
        );
        assert!(csv_values("").is_empty());
    }

    #[test]
    fn steward_filter_accepts_mixed_case() {
        let parsed = parse_steward_filter("Manual").unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed, StewardFilter::Only(StewardKind::Manual));
        assert!(parse_steward_filter("robot").is_err());
    }

    #[test]
    fn blank_window_defaults_to_thirty_days() {
        let parsed = parse_time_window("").unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed, TimeWindow::Last30d);
    }

    #[test]
    fn custom_window_allows_open_bounds() {
        let parsed = parse_time_window("custom:2026-03-01:").unwrap_or_else(|_| unreachable!());
        match parsed {
            TimeWindow::Custom { start, end } => {
                assert!(start.is_some());
                assert!(end.is_none());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn custom_window_rejects_malformed_dates() {
        assert!(parse_time_window("custom:03/01/2026:").is_err());
        assert!(parse_time_window("yesterday").is_err());
    }
}
