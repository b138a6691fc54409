//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod enrichment;
mod filter;
mod stats;
mod update;

pub use enrichment::{
    AllowedSteward, ChangeRange, Impact, MarketContext, RiskLevel, StewardConstraint,
    ValidationOutcome, ValidationStatus,
};
pub use filter::{FilterField, FilterSpec, StewardFilter, TimeWindow};
pub use stats::{ActivityLeader, ChartBucket, HeatmapCell, NetworkActivity, SummaryStats};
pub use update::{Asset, Network, Outcome, ParameterKind, StewardKind, UpdateRecord};
