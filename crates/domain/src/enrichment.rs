use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stewardlens_core::{AppError, AppResult, NonEmptyString};

use crate::update::StewardKind;

/// Assessed severity of a parameter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine adjustment.
    Low,
    /// Noticeable but contained effect.
    Medium,
    /// Large effect on market behavior.
    High,
    /// Severe effect, potential liquidation cascades.
    Critical,
}

impl RiskLevel {
    /// Returns the feed display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            "Critical" => Ok(Self::Critical),
            _ => Err(AppError::Validation(format!("unknown risk level '{value}'"))),
        }
    }
}

/// Assessed impact of one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    risk_level: RiskLevel,
    description: NonEmptyString,
    affected_users: Option<u64>,
    protocol_tvl: Option<String>,
    estimated_impact: Option<String>,
}

impl Impact {
    /// Creates a validated impact assessment.
    pub fn new(
        risk_level: RiskLevel,
        description: impl Into<String>,
        affected_users: Option<u64>,
        protocol_tvl: Option<String>,
        estimated_impact: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            risk_level,
            description: NonEmptyString::new(description)?,
            affected_users,
            protocol_tvl,
            estimated_impact,
        })
    }

    /// Returns the severity level.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns the impact description.
    #[must_use]
    pub fn description(&self) -> &NonEmptyString {
        &self.description
    }

    /// Returns the optional affected-user estimate.
    #[must_use]
    pub fn affected_users(&self) -> Option<u64> {
        self.affected_users
    }

    /// Returns the optional protocol TVL display string.
    #[must_use]
    pub fn protocol_tvl(&self) -> Option<&str> {
        self.protocol_tvl.as_deref()
    }

    /// Returns the optional estimated impact display string.
    #[must_use]
    pub fn estimated_impact(&self) -> Option<&str> {
        self.estimated_impact.as_deref()
    }
}

/// Market snapshot captured when an update landed. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    price_change_24h: Option<f64>,
    volume_24h: Option<String>,
    market_cap: Option<String>,
    total_supply: Option<String>,
    utilization_rate: Option<f64>,
    average_apr: Option<f64>,
}

impl MarketContext {
    /// Creates a validated market snapshot.
    pub fn new(
        price_change_24h: Option<f64>,
        volume_24h: Option<String>,
        market_cap: Option<String>,
        total_supply: Option<String>,
        utilization_rate: Option<f64>,
        average_apr: Option<f64>,
    ) -> AppResult<Self> {
        if let Some(rate) = utilization_rate
            && !(0.0..=100.0).contains(&rate)
        {
            return Err(AppError::Validation(
                "utilization rate must be between 0 and 100".to_owned(),
            ));
        }

        Ok(Self {
            price_change_24h,
            volume_24h,
            market_cap,
            total_supply,
            utilization_rate,
            average_apr,
        })
    }

    /// Returns the 24-hour price change percentage.
    #[must_use]
    pub fn price_change_24h(&self) -> Option<f64> {
        self.price_change_24h
    }

    /// Returns the 24-hour volume display string.
    #[must_use]
    pub fn volume_24h(&self) -> Option<&str> {
        self.volume_24h.as_deref()
    }

    /// Returns the market capitalization display string.
    #[must_use]
    pub fn market_cap(&self) -> Option<&str> {
        self.market_cap.as_deref()
    }

    /// Returns the total supply display string.
    #[must_use]
    pub fn total_supply(&self) -> Option<&str> {
        self.total_supply.as_deref()
    }

    /// Returns the market utilization rate percentage.
    #[must_use]
    pub fn utilization_rate(&self) -> Option<f64> {
        self.utilization_rate
    }

    /// Returns the average APR percentage.
    #[must_use]
    pub fn average_apr(&self) -> Option<f64> {
        self.average_apr
    }
}

/// Result of one pre-flight validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Rule satisfied.
    Passed,
    /// Rule violated.
    Failed,
    /// Rule satisfied with a caveat.
    Warning,
}

impl ValidationStatus {
    /// Returns the feed display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Warning => "Warning",
        }
    }
}

/// One named validation rule and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    rule: NonEmptyString,
    status: ValidationStatus,
    description: NonEmptyString,
}

impl ValidationOutcome {
    /// Creates a validated rule outcome.
    pub fn new(
        rule: impl Into<String>,
        status: ValidationStatus,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            rule: NonEmptyString::new(rule)?,
            status,
            description: NonEmptyString::new(description)?,
        })
    }

    /// Returns the rule name.
    #[must_use]
    pub fn rule(&self) -> &NonEmptyString {
        &self.rule
    }

    /// Returns the rule outcome.
    #[must_use]
    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    /// Returns the rule description.
    #[must_use]
    pub fn description(&self) -> &NonEmptyString {
        &self.description
    }
}

/// Steward kinds permitted to modify a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedSteward {
    /// Only manual changes permitted.
    Manual,
    /// Only automated changes permitted.
    Automated,
    /// Either steward kind permitted.
    Both,
}

impl AllowedSteward {
    /// Returns the feed display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Automated => "Automated",
            Self::Both => "Both",
        }
    }

    /// Returns whether the given steward kind may modify the parameter.
    #[must_use]
    pub fn permits(&self, kind: StewardKind) -> bool {
        match self {
            Self::Manual => kind == StewardKind::Manual,
            Self::Automated => kind == StewardKind::Automated,
            Self::Both => true,
        }
    }
}

/// Bounds a single change may move a parameter by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRange {
    percent_min: f64,
    percent_max: f64,
    absolute_min: NonEmptyString,
    absolute_max: NonEmptyString,
    unit: NonEmptyString,
}

impl ChangeRange {
    /// Creates a validated change range.
    pub fn new(
        percent_min: f64,
        percent_max: f64,
        absolute_min: impl Into<String>,
        absolute_max: impl Into<String>,
        unit: impl Into<String>,
    ) -> AppResult<Self> {
        if percent_min > percent_max {
            return Err(AppError::Validation(
                "change range percent minimum exceeds maximum".to_owned(),
            ));
        }

        Ok(Self {
            percent_min,
            percent_max,
            absolute_min: NonEmptyString::new(absolute_min)?,
            absolute_max: NonEmptyString::new(absolute_max)?,
            unit: NonEmptyString::new(unit)?,
        })
    }

    /// Returns the minimum relative change percentage.
    #[must_use]
    pub fn percent_min(&self) -> f64 {
        self.percent_min
    }

    /// Returns the maximum relative change percentage.
    #[must_use]
    pub fn percent_max(&self) -> f64 {
        self.percent_max
    }

    /// Returns the minimum absolute value display string.
    #[must_use]
    pub fn absolute_min(&self) -> &NonEmptyString {
        &self.absolute_min
    }

    /// Returns the maximum absolute value display string.
    #[must_use]
    pub fn absolute_max(&self) -> &NonEmptyString {
        &self.absolute_max
    }

    /// Returns the unit of the absolute bounds.
    #[must_use]
    pub fn unit(&self) -> &NonEmptyString {
        &self.unit
    }
}

/// Governance constraint in force for a parameter at update time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StewardConstraint {
    allowed_steward: AllowedSteward,
    last_modifier: NonEmptyString,
    last_modified_at: DateTime<Utc>,
    modifiable: bool,
    hours_until_modifiable: Option<u32>,
    change_range: ChangeRange,
}

impl StewardConstraint {
    /// Creates a validated steward constraint.
    ///
    /// A constraint that is already modifiable cannot also carry a
    /// remaining cooldown.
    pub fn new(
        allowed_steward: AllowedSteward,
        last_modifier: impl Into<String>,
        last_modified_at: DateTime<Utc>,
        modifiable: bool,
        hours_until_modifiable: Option<u32>,
        change_range: ChangeRange,
    ) -> AppResult<Self> {
        if modifiable && hours_until_modifiable.is_some() {
            return Err(AppError::Validation(
                "modifiable constraints must not carry a remaining cooldown".to_owned(),
            ));
        }

        Ok(Self {
            allowed_steward,
            last_modifier: NonEmptyString::new(last_modifier)?,
            last_modified_at,
            modifiable,
            hours_until_modifiable,
            change_range,
        })
    }

    /// Returns the permitted steward kinds.
    #[must_use]
    pub fn allowed_steward(&self) -> AllowedSteward {
        self.allowed_steward
    }

    /// Returns the last modifier address or identifier.
    #[must_use]
    pub fn last_modifier(&self) -> &NonEmptyString {
        &self.last_modifier
    }

    /// Returns when the parameter was last modified.
    #[must_use]
    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    /// Returns whether the parameter may currently be modified.
    #[must_use]
    pub fn modifiable(&self) -> bool {
        self.modifiable
    }

    /// Returns hours remaining until modification is allowed again.
    #[must_use]
    pub fn hours_until_modifiable(&self) -> Option<u32> {
        self.hours_until_modifiable
    }

    /// Returns the permitted change range.
    #[must_use]
    pub fn change_range(&self) -> &ChangeRange {
        &self.change_range
    }
}
