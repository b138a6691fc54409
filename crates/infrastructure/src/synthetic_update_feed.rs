use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stewardlens_application::UpdateFeed;
use stewardlens_core::AppResult;
use stewardlens_domain::{
    AllowedSteward, Asset, ChangeRange, Impact, MarketContext, Network, Outcome, ParameterKind,
    RiskLevel, StewardConstraint, StewardKind, UpdateRecord, ValidationOutcome, ValidationStatus,
};
use tracing::debug;

const AUTOMATED_REASONS: [&str; 5] = [
    "Market volatility threshold exceeded",
    "Utilization rate optimization",
    "Risk model adjustment",
    "Automated rebalancing trigger",
    "Protocol safety mechanism",
];

const MANUAL_REASONS: [&str; 5] = [
    "Community governance proposal",
    "Risk committee recommendation",
    "Emergency protocol action",
    "Strategic parameter adjustment",
    "Market condition response",
];

/// Cooldown a parameter observes between modifications.
const MODIFICATION_COOLDOWN_HOURS: f64 = 72.0;

/// Tuning knobs for the synthetic feed.
#[derive(Debug, Clone)]
pub struct SyntheticFeedConfig {
    /// Records to generate.
    pub record_count: usize,
    /// Trailing window the timestamps are spread over.
    pub window_days: u32,
    /// Fixed RNG seed; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for SyntheticFeedConfig {
    fn default() -> Self {
        Self {
            record_count: 75,
            window_days: 30,
            seed: None,
        }
    }
}

/// Update feed producing a randomized but realistic parameter-change
/// history across the supported networks and assets.
///
/// The same seed always yields the same collection relative to the moment
/// of generation, which keeps development snapshots reproducible.
pub struct SyntheticUpdateFeed {
    config: SyntheticFeedConfig,
}

impl SyntheticUpdateFeed {
    /// Creates a synthetic feed with the given configuration.
    #[must_use]
    pub fn new(config: SyntheticFeedConfig) -> Self {
        Self { config }
    }

    /// The networks the synthetic history spans.
    pub fn networks() -> AppResult<Vec<Network>> {
        Ok(vec![
            Network::new("ethereum", "Ethereum", 1, Some("🔷".to_owned()))?,
            Network::new("polygon", "Polygon", 137, Some("🟣".to_owned()))?,
            Network::new("arbitrum", "Arbitrum", 42161, Some("🔵".to_owned()))?,
            Network::new("optimism", "Optimism", 10, Some("🔴".to_owned()))?,
            Network::new("base", "Base", 8453, Some("🔵".to_owned()))?,
        ])
    }

    /// The assets the synthetic history spans.
    pub fn assets() -> AppResult<Vec<Asset>> {
        Ok(vec![
            Asset::new("ETH", "Ethereum", Some("🔷".to_owned()))?,
            Asset::new("USDC", "USD Coin", Some("🟢".to_owned()))?,
            Asset::new("DAI", "Dai Stablecoin", Some("🟡".to_owned()))?,
            Asset::new("WBTC", "Wrapped Bitcoin", Some("🟠".to_owned()))?,
            Asset::new("USDT", "Tether USD", Some("🟢".to_owned()))?,
            Asset::new("AAVE", "Aave Token", Some("👻".to_owned()))?,
            Asset::new("LINK", "Chainlink", Some("🔗".to_owned()))?,
            Asset::new("UNI", "Uniswap", Some("🦄".to_owned()))?,
            Asset::new("MATIC", "Polygon", Some("🟣".to_owned()))?,
            Asset::new("ARB", "Arbitrum", Some("🔵".to_owned()))?,
        ])
    }

    fn generate(&self) -> AppResult<Vec<UpdateRecord>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let now = Utc::now();
        let networks = Self::networks()?;
        let assets = Self::assets()?;

        let mut records = Vec::with_capacity(self.config.record_count);
        for index in 1..=self.config.record_count {
            records.push(generate_record(
                &mut rng,
                index,
                self.config.record_count,
                now,
                self.config.window_days,
                &networks,
                &assets,
            )?);
        }

        records.sort_by(|left, right| right.timestamp().cmp(&left.timestamp()));
        Ok(records)
    }
}

impl UpdateFeed for SyntheticUpdateFeed {
    fn updates(&self) -> AppResult<Vec<UpdateRecord>> {
        let records = self.generate()?;
        debug!(
            record_count = records.len(),
            window_days = self.config.window_days,
            "generated synthetic update feed"
        );
        Ok(records)
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_record(
    rng: &mut StdRng,
    index: usize,
    record_count: usize,
    now: DateTime<Utc>,
    window_days: u32,
    networks: &[Network],
    assets: &[Asset],
) -> AppResult<UpdateRecord> {
    let network = networks[rng.gen_range(0..networks.len())].clone();
    let asset = assets[rng.gen_range(0..assets.len())].clone();
    let kinds = ParameterKind::all();
    let kind = kinds[rng.gen_range(0..kinds.len())];

    let steward_kind = if rng.gen_bool(0.4) {
        StewardKind::Automated
    } else {
        StewardKind::Manual
    };
    let outcome = if rng.gen_bool(0.1) {
        Outcome::Failed
    } else if rng.gen_bool(0.05) {
        Outcome::Pending
    } else {
        Outcome::Success
    };

    let timestamp = now
        - Duration::days(rng.gen_range(0..i64::from(window_days.max(1))))
        - Duration::hours(rng.gen_range(0..24))
        - Duration::minutes(rng.gen_range(0..60));

    let (old_value, new_value) = parameter_values(rng, kind, asset.symbol().as_str());

    let mut record = UpdateRecord::new(
        format!("update-{index}"),
        timestamp,
        network,
        asset,
        kind,
        steward_kind,
        old_value,
        new_value,
        format!("0x{}", random_hex(rng, 64)),
        outcome,
    )?
    .with_block_number(18_000_000 + rng.gen_range(0..1_000_000))
    .with_gas(
        rng.gen_range(50_000..250_000u64).to_string(),
        format!("{:.2} gwei", rng.gen_range(20.0..70.0)),
    )
    .with_reason(change_reason(rng, steward_kind))
    .with_impact(generate_impact(rng, kind)?)
    .with_market_context(generate_market_context(rng)?)
    .with_related_record_ids(related_record_ids(rng, index, record_count))
    .with_validation_outcomes(validation_outcomes(rng, kind, outcome)?)
    .with_steward_constraint(generate_steward_constraint(rng, kind, timestamp, now)?);

    if steward_kind == StewardKind::Manual {
        record = record.with_initiator(format!("0x{}", random_hex(rng, 40)));
    }

    Ok(record)
}

fn parameter_values(rng: &mut StdRng, kind: ParameterKind, symbol: &str) -> (String, String) {
    match kind {
        ParameterKind::SupplyCap => (
            format!("{} {symbol}", rng.gen_range(0..100_000_000u64)),
            format!("{} {symbol}", rng.gen_range(0..100_000_000u64)),
        ),
        ParameterKind::BorrowCap => (
            format!("{} {symbol}", rng.gen_range(0..50_000_000u64)),
            format!("{} {symbol}", rng.gen_range(0..50_000_000u64)),
        ),
        ParameterKind::UOptimal
        | ParameterKind::Ltv
        | ParameterKind::Lt
        | ParameterKind::Lb
        | ParameterKind::EModeLtv
        | ParameterKind::EModeLt
        | ParameterKind::EModeLb => (
            format!("{:.1}%", rng.gen_range(0.0..100.0)),
            format!("{:.1}%", rng.gen_range(0.0..100.0)),
        ),
        ParameterKind::BaseRate
        | ParameterKind::Slope1
        | ParameterKind::Slope2
        | ParameterKind::CapoDiscountRate => (
            format!("{:.2}%", rng.gen_range(0.0..20.0)),
            format!("{:.2}%", rng.gen_range(0.0..20.0)),
        ),
        ParameterKind::CapoPriceCaps => (
            format!("${:.2}", rng.gen_range(0.0..10_000.0)),
            format!("${:.2}", rng.gen_range(0.0..10_000.0)),
        ),
    }
}

fn change_reason(rng: &mut StdRng, steward_kind: StewardKind) -> String {
    let reasons = match steward_kind {
        StewardKind::Automated => &AUTOMATED_REASONS,
        StewardKind::Manual => &MANUAL_REASONS,
    };
    reasons[rng.gen_range(0..reasons.len())].to_owned()
}

/// Cap and collateral parameters can swing markets; everything else stays
/// in the low-to-medium band.
fn impact_risk_levels(kind: ParameterKind) -> &'static [RiskLevel] {
    match kind {
        ParameterKind::SupplyCap | ParameterKind::BorrowCap | ParameterKind::Ltv
        | ParameterKind::Lt => &[RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical],
        _ => &[RiskLevel::Low, RiskLevel::Medium],
    }
}

fn generate_impact(rng: &mut StdRng, kind: ParameterKind) -> AppResult<Impact> {
    let levels = impact_risk_levels(kind);
    let risk_level = levels[rng.gen_range(0..levels.len())];

    Impact::new(
        risk_level,
        impact_description(kind, risk_level),
        Some(rng.gen_range(100..10_100)),
        Some(format!("${:.1}M", rng.gen_range(50.0..550.0))),
        Some(format!("{:.2}%", rng.gen_range(0.1..5.1))),
    )
}

fn impact_description(kind: ParameterKind, risk_level: RiskLevel) -> String {
    match (kind, risk_level) {
        (ParameterKind::SupplyCap, RiskLevel::Low) => {
            "Minor adjustment to supply limit with minimal market impact".to_owned()
        }
        (ParameterKind::SupplyCap, RiskLevel::Medium) => {
            "Moderate supply cap change affecting borrowing capacity".to_owned()
        }
        (ParameterKind::SupplyCap, RiskLevel::High) => {
            "Significant supply restriction impacting protocol liquidity".to_owned()
        }
        (ParameterKind::SupplyCap, RiskLevel::Critical) => {
            "Major supply cap reduction with severe market implications".to_owned()
        }
        (ParameterKind::Ltv, RiskLevel::Low) => "Small collateral ratio adjustment".to_owned(),
        (ParameterKind::Ltv, RiskLevel::Medium) => {
            "Moderate LTV change affecting borrowing power".to_owned()
        }
        (ParameterKind::Ltv, RiskLevel::High) => {
            "Significant collateral requirement increase".to_owned()
        }
        (ParameterKind::Ltv, RiskLevel::Critical) => {
            "Major LTV reduction triggering liquidation risk".to_owned()
        }
        _ => format!(
            "{} impact parameter adjustment for {}",
            risk_level.as_str(),
            kind.as_str()
        ),
    }
}

fn generate_market_context(rng: &mut StdRng) -> AppResult<MarketContext> {
    MarketContext::new(
        Some(rng.gen_range(-10.0..10.0)),
        Some(format!("${:.1}M", rng.gen_range(10.0..110.0))),
        Some(format!("${:.1}M", rng.gen_range(100.0..1_100.0))),
        Some(format!("{} units", rng.gen_range(100_000..1_100_000u64))),
        Some(rng.gen_range(0.0..100.0)),
        Some(rng.gen_range(2.0..17.0)),
    )
}

fn validation_outcomes(
    rng: &mut StdRng,
    kind: ParameterKind,
    outcome: Outcome,
) -> AppResult<Vec<ValidationOutcome>> {
    let base_rules = [
        ("Range Validation", "Value within acceptable range"),
        ("Authorization Check", "Caller has required permissions"),
        ("Time Lock Compliance", "Time lock period respected"),
    ];
    let failed_rule = (outcome == Outcome::Failed).then(|| rng.gen_range(0..base_rules.len()));

    let mut outcomes = Vec::with_capacity(base_rules.len() + 1);
    for (position, (rule, description)) in base_rules.iter().enumerate() {
        let status = if failed_rule == Some(position) {
            ValidationStatus::Failed
        } else {
            ValidationStatus::Passed
        };
        outcomes.push(ValidationOutcome::new(*rule, status, *description)?);
    }

    if matches!(kind, ParameterKind::SupplyCap | ParameterKind::BorrowCap) {
        let status = if rng.gen_bool(0.2) {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Passed
        };
        outcomes.push(ValidationOutcome::new(
            "Liquidity Impact",
            status,
            "Change impact on protocol liquidity assessed",
        )?);
    }

    Ok(outcomes)
}

fn related_record_ids(rng: &mut StdRng, index: usize, record_count: usize) -> Vec<String> {
    let related_count = rng.gen_range(0..3);
    let mut related = Vec::with_capacity(related_count);
    for _ in 0..related_count {
        let candidate = rng.gen_range(1..=record_count.max(1));
        if candidate != index {
            related.push(format!("update-{candidate}"));
        }
    }
    related
}

fn generate_steward_constraint(
    rng: &mut StdRng,
    kind: ParameterKind,
    last_modified_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<StewardConstraint> {
    let guarded = matches!(
        kind,
        ParameterKind::SupplyCap
            | ParameterKind::BorrowCap
            | ParameterKind::Ltv
            | ParameterKind::Lt
            | ParameterKind::Lb
    );
    let allowed_steward = if guarded {
        if rng.gen_bool(0.3) {
            AllowedSteward::Manual
        } else {
            AllowedSteward::Both
        }
    } else if rng.gen_bool(0.7) {
        AllowedSteward::Automated
    } else {
        AllowedSteward::Both
    };

    let last_modifier = if rng.gen_bool(0.4) {
        format!("0x{}", random_hex(rng, 40))
    } else {
        "System Automated Steward".to_owned()
    };

    let hours_since = (now - last_modified_at).num_minutes() as f64 / 60.0;
    let modifiable = hours_since >= MODIFICATION_COOLDOWN_HOURS;
    let hours_until_modifiable =
        (!modifiable).then(|| (MODIFICATION_COOLDOWN_HOURS - hours_since).ceil() as u32);

    StewardConstraint::new(
        allowed_steward,
        last_modifier,
        last_modified_at,
        modifiable,
        hours_until_modifiable,
        change_range(kind)?,
    )
}

fn change_range(kind: ParameterKind) -> AppResult<ChangeRange> {
    match kind {
        ParameterKind::SupplyCap | ParameterKind::BorrowCap => {
            ChangeRange::new(-50.0, 100.0, "1000000", "100000000", "tokens")
        }
        ParameterKind::UOptimal
        | ParameterKind::Ltv
        | ParameterKind::Lt
        | ParameterKind::Lb
        | ParameterKind::EModeLtv
        | ParameterKind::EModeLt
        | ParameterKind::EModeLb => ChangeRange::new(-10.0, 10.0, "0.1", "95.0", "%"),
        ParameterKind::BaseRate
        | ParameterKind::Slope1
        | ParameterKind::Slope2
        | ParameterKind::CapoDiscountRate => ChangeRange::new(-25.0, 50.0, "0.01", "20.0", "%"),
        ParameterKind::CapoPriceCaps => ChangeRange::new(-30.0, 30.0, "100", "50000", "USD"),
    }
}

fn random_hex(rng: &mut StdRng, len: usize) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    (0..len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use stewardlens_application::UpdateFeed;
    use stewardlens_domain::StewardKind;

    use super::{SyntheticFeedConfig, SyntheticUpdateFeed};

    fn seeded(seed: u64) -> SyntheticUpdateFeed {
        SyntheticUpdateFeed::new(SyntheticFeedConfig {
            record_count: 40,
            window_days: 30,
            seed: Some(seed),
        })
    }

    #[test]
    fn generates_the_configured_record_count() {
        let records = seeded(7).updates().unwrap_or_else(|_| unreachable!());
        assert_eq!(records.len(), 40);
    }

    #[test]
    fn same_seed_draws_the_same_history() {
        let first = seeded(42).updates().unwrap_or_else(|_| unreachable!());
        let second = seeded(42).updates().unwrap_or_else(|_| unreachable!());

        let first_refs: Vec<&str> = first.iter().map(|r| r.transaction_ref().as_str()).collect();
        let second_refs: Vec<&str> = second.iter().map(|r| r.transaction_ref().as_str()).collect();
        assert_eq!(first_refs, second_refs);
    }

    #[test]
    fn record_ids_are_unique() {
        let records = seeded(3).updates().unwrap_or_else(|_| unreachable!());
        let mut ids: Vec<&str> = records.iter().map(|r| r.id().as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn history_is_sorted_newest_first_within_the_window() {
        let records = seeded(11).updates().unwrap_or_else(|_| unreachable!());
        let now = Utc::now();

        for pair in records.windows(2) {
            assert!(pair[0].timestamp() >= pair[1].timestamp());
        }
        assert!(
            records
                .iter()
                .all(|record| record.timestamp() >= now - Duration::days(32))
        );
    }

    #[test]
    fn manual_records_carry_an_initiator() {
        let records = seeded(5).updates().unwrap_or_else(|_| unreachable!());
        for record in records {
            match record.steward_kind() {
                StewardKind::Manual => assert!(record.initiator().is_some()),
                StewardKind::Automated => assert!(record.initiator().is_none()),
            }
        }
    }

    #[test]
    fn every_record_is_fully_enriched() {
        let records = seeded(9).updates().unwrap_or_else(|_| unreachable!());
        for record in records {
            assert!(record.impact().is_some());
            assert!(record.market_context().is_some());
            assert!(record.steward_constraint().is_some());
            assert!(record.validation_outcomes().len() >= 3);
            assert!(record.block_number().is_some());
        }
    }
}
