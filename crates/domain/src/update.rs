use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stewardlens_core::{AppError, AppResult, NonEmptyString};

use crate::enrichment::{Impact, MarketContext, StewardConstraint, ValidationOutcome};

/// The risk configuration field changed by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Market supply ceiling.
    SupplyCap,
    /// Market borrow ceiling.
    BorrowCap,
    /// Optimal utilization point of the interest rate curve.
    UOptimal,
    /// Base interest rate.
    BaseRate,
    /// Interest rate slope below optimal utilization.
    Slope1,
    /// Interest rate slope above optimal utilization.
    Slope2,
    /// Loan-to-value ratio.
    Ltv,
    /// Liquidation threshold.
    Lt,
    /// Liquidation bonus.
    Lb,
    /// Efficiency-mode loan-to-value ratio.
    EModeLtv,
    /// Efficiency-mode liquidation threshold.
    EModeLt,
    /// Efficiency-mode liquidation bonus.
    EModeLb,
    /// Capo oracle discount rate.
    CapoDiscountRate,
    /// Capo oracle price caps.
    CapoPriceCaps,
}

impl ParameterKind {
    /// All parameter kinds in declaration order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::SupplyCap,
            Self::BorrowCap,
            Self::UOptimal,
            Self::BaseRate,
            Self::Slope1,
            Self::Slope2,
            Self::Ltv,
            Self::Lt,
            Self::Lb,
            Self::EModeLtv,
            Self::EModeLt,
            Self::EModeLb,
            Self::CapoDiscountRate,
            Self::CapoPriceCaps,
        ]
    }

    /// Returns the feed display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SupplyCap => "Supply Cap",
            Self::BorrowCap => "Borrow Cap",
            Self::UOptimal => "uOptimal",
            Self::BaseRate => "Base Rate",
            Self::Slope1 => "Slope1",
            Self::Slope2 => "Slope2",
            Self::Ltv => "LTV",
            Self::Lt => "LT",
            Self::Lb => "LB",
            Self::EModeLtv => "E-Mode LTV",
            Self::EModeLt => "E-Mode LT",
            Self::EModeLb => "E-Mode LB",
            Self::CapoDiscountRate => "Capo Discount Rate",
            Self::CapoPriceCaps => "Capo Price Caps",
        }
    }
}

impl FromStr for ParameterKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|kind| kind.as_str() == value)
            .copied()
            .ok_or_else(|| AppError::Validation(format!("unknown parameter kind '{value}'")))
    }
}

/// The actor class that initiated a parameter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StewardKind {
    /// Human-initiated change.
    Manual,
    /// System-initiated change.
    Automated,
}

impl StewardKind {
    /// Returns the feed display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Automated => "Automated",
        }
    }
}

impl FromStr for StewardKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Manual" => Ok(Self::Manual),
            "Automated" => Ok(Self::Automated),
            _ => Err(AppError::Validation(format!(
                "unknown steward kind '{value}'"
            ))),
        }
    }
}

/// Terminal or pending state of a submitted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Update applied on chain.
    Success,
    /// Update reverted or rejected.
    Failed,
    /// Update submitted but not yet confirmed.
    Pending,
}

impl Outcome {
    /// Returns the feed display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Pending => "Pending",
        }
    }
}

impl FromStr for Outcome {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Success" => Ok(Self::Success),
            "Failed" => Ok(Self::Failed),
            "Pending" => Ok(Self::Pending),
            _ => Err(AppError::Validation(format!("unknown outcome '{value}'"))),
        }
    }
}

/// A blockchain network carrying risk-managed markets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    id: NonEmptyString,
    display_name: NonEmptyString,
    chain_id: i64,
    icon: Option<String>,
}

impl Network {
    /// Creates a validated network descriptor.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        chain_id: i64,
        icon: Option<String>,
    ) -> AppResult<Self> {
        if chain_id <= 0 {
            return Err(AppError::Validation(
                "network chain id must be positive".to_owned(),
            ));
        }

        Ok(Self {
            id: NonEmptyString::new(id)?,
            display_name: NonEmptyString::new(display_name)?,
            chain_id,
            icon: icon.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
        })
    }

    /// Returns the stable network identifier.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the human-readable network name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the numeric chain identifier.
    #[must_use]
    pub fn chain_id(&self) -> i64 {
        self.chain_id
    }

    /// Returns the optional icon glyph.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

/// A token or market affected by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    symbol: NonEmptyString,
    display_name: NonEmptyString,
    icon: Option<String>,
}

impl Asset {
    /// Creates a validated asset descriptor.
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        icon: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            symbol: NonEmptyString::new(symbol)?,
            display_name: NonEmptyString::new(display_name)?,
            icon: icon.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
        })
    }

    /// Returns the ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &NonEmptyString {
        &self.symbol
    }

    /// Returns the human-readable asset name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the optional icon glyph.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

/// One risk-parameter change observed on a network. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecord {
    id: NonEmptyString,
    timestamp: DateTime<Utc>,
    network: Network,
    asset: Asset,
    parameter_kind: ParameterKind,
    steward_kind: StewardKind,
    old_value: String,
    new_value: String,
    transaction_ref: NonEmptyString,
    outcome: Outcome,
    initiator: Option<String>,
    block_number: Option<u64>,
    gas_used: Option<String>,
    gas_price: Option<String>,
    reason: Option<String>,
    impact: Option<Impact>,
    market_context: Option<MarketContext>,
    related_record_ids: Vec<String>,
    validation_outcomes: Vec<ValidationOutcome>,
    steward_constraint: Option<StewardConstraint>,
}

impl UpdateRecord {
    /// Creates a validated update record with the required fields only.
    ///
    /// Enrichment fields are attached afterwards with the `with_*`
    /// combinators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        network: Network,
        asset: Asset,
        parameter_kind: ParameterKind,
        steward_kind: StewardKind,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
        transaction_ref: impl Into<String>,
        outcome: Outcome,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            timestamp,
            network,
            asset,
            parameter_kind,
            steward_kind,
            old_value: old_value.into(),
            new_value: new_value.into(),
            transaction_ref: NonEmptyString::new(transaction_ref)?,
            outcome,
            initiator: None,
            block_number: None,
            gas_used: None,
            gas_price: None,
            reason: None,
            impact: None,
            market_context: None,
            related_record_ids: Vec::new(),
            validation_outcomes: Vec::new(),
            steward_constraint: None,
        })
    }

    /// Attaches the initiating address.
    #[must_use]
    pub fn with_initiator(mut self, initiator: impl Into<String>) -> Self {
        self.initiator = Some(initiator.into());
        self
    }

    /// Attaches the block number the update landed in.
    #[must_use]
    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = Some(block_number);
        self
    }

    /// Attaches gas usage and gas price display strings.
    #[must_use]
    pub fn with_gas(mut self, gas_used: impl Into<String>, gas_price: impl Into<String>) -> Self {
        self.gas_used = Some(gas_used.into());
        self.gas_price = Some(gas_price.into());
        self
    }

    /// Attaches the stated reason for the change.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the assessed impact.
    #[must_use]
    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }

    /// Attaches the market snapshot taken at update time.
    #[must_use]
    pub fn with_market_context(mut self, market_context: MarketContext) -> Self {
        self.market_context = Some(market_context);
        self
    }

    /// Attaches identifiers of related update records.
    #[must_use]
    pub fn with_related_record_ids(mut self, related_record_ids: Vec<String>) -> Self {
        self.related_record_ids = related_record_ids;
        self
    }

    /// Attaches per-rule validation outcomes.
    #[must_use]
    pub fn with_validation_outcomes(mut self, validation_outcomes: Vec<ValidationOutcome>) -> Self {
        self.validation_outcomes = validation_outcomes;
        self
    }

    /// Attaches the steward constraint in force for the parameter.
    #[must_use]
    pub fn with_steward_constraint(mut self, steward_constraint: StewardConstraint) -> Self {
        self.steward_constraint = Some(steward_constraint);
        self
    }

    /// Returns the unique record identifier.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the moment the update occurred.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the target network.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the affected asset.
    #[must_use]
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Returns the changed parameter kind.
    #[must_use]
    pub fn parameter_kind(&self) -> ParameterKind {
        self.parameter_kind
    }

    /// Returns the initiating steward kind.
    #[must_use]
    pub fn steward_kind(&self) -> StewardKind {
        self.steward_kind
    }

    /// Returns the previous value display string.
    #[must_use]
    pub fn old_value(&self) -> &str {
        self.old_value.as_str()
    }

    /// Returns the new value display string.
    #[must_use]
    pub fn new_value(&self) -> &str {
        self.new_value.as_str()
    }

    /// Returns the opaque transaction reference.
    #[must_use]
    pub fn transaction_ref(&self) -> &NonEmptyString {
        &self.transaction_ref
    }

    /// Returns the update outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the optional initiating address.
    #[must_use]
    pub fn initiator(&self) -> Option<&str> {
        self.initiator.as_deref()
    }

    /// Returns the optional block number.
    #[must_use]
    pub fn block_number(&self) -> Option<u64> {
        self.block_number
    }

    /// Returns the optional gas usage display string.
    #[must_use]
    pub fn gas_used(&self) -> Option<&str> {
        self.gas_used.as_deref()
    }

    /// Returns the optional gas price display string.
    #[must_use]
    pub fn gas_price(&self) -> Option<&str> {
        self.gas_price.as_deref()
    }

    /// Returns the optional change reason.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the optional assessed impact.
    #[must_use]
    pub fn impact(&self) -> Option<&Impact> {
        self.impact.as_ref()
    }

    /// Returns the optional market snapshot.
    #[must_use]
    pub fn market_context(&self) -> Option<&MarketContext> {
        self.market_context.as_ref()
    }

    /// Returns identifiers of related records.
    #[must_use]
    pub fn related_record_ids(&self) -> &[String] {
        &self.related_record_ids
    }

    /// Returns per-rule validation outcomes.
    #[must_use]
    pub fn validation_outcomes(&self) -> &[ValidationOutcome] {
        &self.validation_outcomes
    }

    /// Returns the optional steward constraint.
    #[must_use]
    pub fn steward_constraint(&self) -> Option<&StewardConstraint> {
        self.steward_constraint.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::{Asset, Network, Outcome, ParameterKind, StewardKind, UpdateRecord};

    fn ethereum() -> Network {
        Network::new("ethereum", "Ethereum", 1, Some("🔷".to_owned()))
            .unwrap_or_else(|_| unreachable!())
    }

    fn eth() -> Asset {
        Asset::new("ETH", "Ethereum", None).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn parameter_kind_labels_round_trip() {
        for kind in ParameterKind::all() {
            let parsed = ParameterKind::from_str(kind.as_str());
            assert_eq!(parsed.ok(), Some(*kind));
        }
    }

    #[test]
    fn parameter_kind_rejects_unknown_label() {
        assert!(ParameterKind::from_str("Oracle Price").is_err());
    }

    #[test]
    fn steward_kind_rejects_unknown_label() {
        assert!(StewardKind::from_str("Robot").is_err());
    }

    #[test]
    fn network_rejects_non_positive_chain_id() {
        assert!(Network::new("ethereum", "Ethereum", 0, None).is_err());
    }

    #[test]
    fn network_discards_blank_icon() {
        let network = Network::new("base", "Base", 8453, Some("  ".to_owned()))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(network.icon(), None);
    }

    #[test]
    fn update_record_rejects_empty_transaction_ref() {
        let record = UpdateRecord::new(
            "update-1",
            Utc::now(),
            ethereum(),
            eth(),
            ParameterKind::SupplyCap,
            StewardKind::Manual,
            "100 ETH",
            "200 ETH",
            "",
            Outcome::Success,
        );
        assert!(record.is_err());
    }

    #[test]
    fn update_record_starts_without_enrichments() {
        let record = UpdateRecord::new(
            "update-1",
            Utc::now(),
            ethereum(),
            eth(),
            ParameterKind::Ltv,
            StewardKind::Automated,
            "80.0%",
            "82.5%",
            "0xabc",
            Outcome::Success,
        )
        .unwrap_or_else(|_| unreachable!());

        assert!(record.impact().is_none());
        assert!(record.validation_outcomes().is_empty());
        assert!(record.related_record_ids().is_empty());
    }
}
