use chrono::Utc;
use serde::Serialize;
use stewardlens_application::DashboardSnapshot;
use stewardlens_domain::{
    ActivityLeader, Asset, ChangeRange, ChartBucket, FilterSpec, HeatmapCell, Impact,
    MarketContext, Network, NetworkActivity, StewardConstraint, SummaryStats, UpdateRecord,
    ValidationOutcome,
};
use ts_rs::TS;
use uuid::Uuid;

/// Full dashboard snapshot payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/snapshot-response.ts"
)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
    pub generated_at: String,
    pub active_filter_count: u32,
    pub updates: Vec<UpdateRecordResponse>,
    pub chart: Vec<ChartBucketResponse>,
    pub heatmap: Vec<HeatmapCellResponse>,
    pub stats: SummaryStatsResponse,
    pub activity: NetworkActivityResponse,
}

impl SnapshotResponse {
    /// Wraps a derived snapshot for the wire, stamping id and time.
    pub fn new(snapshot: DashboardSnapshot, filter: &FilterSpec) -> Self {
        Self {
            snapshot_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            active_filter_count: count(filter.active_count()),
            updates: snapshot
                .updates
                .into_iter()
                .map(UpdateRecordResponse::from)
                .collect(),
            chart: snapshot
                .chart
                .into_iter()
                .map(ChartBucketResponse::from)
                .collect(),
            heatmap: snapshot
                .heatmap
                .into_iter()
                .map(HeatmapCellResponse::from)
                .collect(),
            stats: SummaryStatsResponse::from(snapshot.stats),
            activity: NetworkActivityResponse::from(snapshot.activity),
        }
    }
}

/// Wire representation of one parameter update.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/update-record-response.ts"
)]
pub struct UpdateRecordResponse {
    pub id: String,
    pub timestamp: String,
    pub network: NetworkResponse,
    pub asset: AssetResponse,
    pub parameter_kind: String,
    pub steward_kind: String,
    pub old_value: String,
    pub new_value: String,
    pub transaction_ref: String,
    pub outcome: String,
    pub initiator: Option<String>,
    #[ts(type = "number | null")]
    pub block_number: Option<u64>,
    pub gas_used: Option<String>,
    pub gas_price: Option<String>,
    pub reason: Option<String>,
    pub impact: Option<ImpactResponse>,
    pub market_context: Option<MarketContextResponse>,
    pub related_record_ids: Vec<String>,
    pub validation_outcomes: Vec<ValidationOutcomeResponse>,
    pub steward_constraint: Option<StewardConstraintResponse>,
}

/// Wire representation of a network descriptor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/network-response.ts"
)]
pub struct NetworkResponse {
    pub id: String,
    pub display_name: String,
    #[ts(type = "number")]
    pub chain_id: i64,
    pub icon: Option<String>,
}

/// Wire representation of an asset descriptor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/asset-response.ts"
)]
pub struct AssetResponse {
    pub symbol: String,
    pub display_name: String,
    pub icon: Option<String>,
}

/// Wire representation of an impact assessment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/impact-response.ts"
)]
pub struct ImpactResponse {
    pub risk_level: String,
    pub description: String,
    #[ts(type = "number | null")]
    pub affected_users: Option<u64>,
    pub protocol_tvl: Option<String>,
    pub estimated_impact: Option<String>,
}

/// Wire representation of a market snapshot.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/market-context-response.ts"
)]
pub struct MarketContextResponse {
    pub price_change_24h: Option<f64>,
    pub volume_24h: Option<String>,
    pub market_cap: Option<String>,
    pub total_supply: Option<String>,
    pub utilization_rate: Option<f64>,
    pub average_apr: Option<f64>,
}

/// Wire representation of one validation rule outcome.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/validation-outcome-response.ts"
)]
pub struct ValidationOutcomeResponse {
    pub rule: String,
    pub status: String,
    pub description: String,
}

/// Wire representation of a steward constraint.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/steward-constraint-response.ts"
)]
pub struct StewardConstraintResponse {
    pub allowed_steward: String,
    pub last_modifier: String,
    pub last_modified_at: String,
    pub modifiable: bool,
    pub hours_until_modifiable: Option<u32>,
    pub change_range: ChangeRangeResponse,
}

/// Wire representation of a permitted change range.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/change-range-response.ts"
)]
pub struct ChangeRangeResponse {
    pub percent_min: f64,
    pub percent_max: f64,
    pub absolute_min: String,
    pub absolute_max: String,
    pub unit: String,
}

/// Wire representation of one chart day bucket.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/chart-bucket-response.ts"
)]
pub struct ChartBucketResponse {
    pub date: String,
    pub total_count: u32,
    pub manual_count: u32,
    pub automated_count: u32,
}

/// Wire representation of one heatmap cell.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/heatmap-cell-response.ts"
)]
pub struct HeatmapCellResponse {
    pub asset: String,
    pub network: String,
    pub count: u32,
    pub last_update: String,
}

/// Wire representation of a most-active leader entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/activity-leader-response.ts"
)]
pub struct ActivityLeaderResponse {
    pub label: String,
    pub count: u32,
}

/// Wire representation of the summary statistics card.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/summary-stats-response.ts"
)]
pub struct SummaryStatsResponse {
    pub total_count: u32,
    pub count_today: u32,
    pub most_active_asset: Option<ActivityLeaderResponse>,
    pub most_active_network: Option<ActivityLeaderResponse>,
    pub mean_interval_hours: f64,
    pub success_rate_percent: f64,
    pub automation_rate_percent: f64,
    pub critical_count: u32,
}

/// Wire representation of the headline activity tallies.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/dashboard-types/src/generated/network-activity-response.ts"
)]
pub struct NetworkActivityResponse {
    pub active_networks: u32,
    pub manual_count: u32,
    pub automated_count: u32,
    pub success_count: u32,
    pub failed_count: u32,
}

impl From<UpdateRecord> for UpdateRecordResponse {
    fn from(record: UpdateRecord) -> Self {
        Self {
            id: record.id().as_str().to_owned(),
            timestamp: record.timestamp().to_rfc3339(),
            network: NetworkResponse::from(record.network().clone()),
            asset: AssetResponse::from(record.asset().clone()),
            parameter_kind: record.parameter_kind().as_str().to_owned(),
            steward_kind: record.steward_kind().as_str().to_owned(),
            old_value: record.old_value().to_owned(),
            new_value: record.new_value().to_owned(),
            transaction_ref: record.transaction_ref().as_str().to_owned(),
            outcome: record.outcome().as_str().to_owned(),
            initiator: record.initiator().map(str::to_owned),
            block_number: record.block_number(),
            gas_used: record.gas_used().map(str::to_owned),
            gas_price: record.gas_price().map(str::to_owned),
            reason: record.reason().map(str::to_owned),
            impact: record.impact().cloned().map(ImpactResponse::from),
            market_context: record
                .market_context()
                .cloned()
                .map(MarketContextResponse::from),
            related_record_ids: record.related_record_ids().to_vec(),
            validation_outcomes: record
                .validation_outcomes()
                .iter()
                .cloned()
                .map(ValidationOutcomeResponse::from)
                .collect(),
            steward_constraint: record
                .steward_constraint()
                .cloned()
                .map(StewardConstraintResponse::from),
        }
    }
}

impl From<Network> for NetworkResponse {
    fn from(network: Network) -> Self {
        Self {
            id: network.id().as_str().to_owned(),
            display_name: network.display_name().as_str().to_owned(),
            chain_id: network.chain_id(),
            icon: network.icon().map(str::to_owned),
        }
    }
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            symbol: asset.symbol().as_str().to_owned(),
            display_name: asset.display_name().as_str().to_owned(),
            icon: asset.icon().map(str::to_owned),
        }
    }
}

impl From<Impact> for ImpactResponse {
    fn from(impact: Impact) -> Self {
        Self {
            risk_level: impact.risk_level().as_str().to_owned(),
            description: impact.description().as_str().to_owned(),
            affected_users: impact.affected_users(),
            protocol_tvl: impact.protocol_tvl().map(str::to_owned),
            estimated_impact: impact.estimated_impact().map(str::to_owned),
        }
    }
}

impl From<MarketContext> for MarketContextResponse {
    fn from(context: MarketContext) -> Self {
        Self {
            price_change_24h: context.price_change_24h(),
            volume_24h: context.volume_24h().map(str::to_owned),
            market_cap: context.market_cap().map(str::to_owned),
            total_supply: context.total_supply().map(str::to_owned),
            utilization_rate: context.utilization_rate(),
            average_apr: context.average_apr(),
        }
    }
}

impl From<ValidationOutcome> for ValidationOutcomeResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            rule: outcome.rule().as_str().to_owned(),
            status: outcome.status().as_str().to_owned(),
            description: outcome.description().as_str().to_owned(),
        }
    }
}

impl From<StewardConstraint> for StewardConstraintResponse {
    fn from(constraint: StewardConstraint) -> Self {
        Self {
            allowed_steward: constraint.allowed_steward().as_str().to_owned(),
            last_modifier: constraint.last_modifier().as_str().to_owned(),
            last_modified_at: constraint.last_modified_at().to_rfc3339(),
            modifiable: constraint.modifiable(),
            hours_until_modifiable: constraint.hours_until_modifiable(),
            change_range: ChangeRangeResponse::from(constraint.change_range().clone()),
        }
    }
}

impl From<ChangeRange> for ChangeRangeResponse {
    fn from(range: ChangeRange) -> Self {
        Self {
            percent_min: range.percent_min(),
            percent_max: range.percent_max(),
            absolute_min: range.absolute_min().as_str().to_owned(),
            absolute_max: range.absolute_max().as_str().to_owned(),
            unit: range.unit().as_str().to_owned(),
        }
    }
}

impl From<ChartBucket> for ChartBucketResponse {
    fn from(bucket: ChartBucket) -> Self {
        Self {
            date: bucket.date.to_string(),
            total_count: count(bucket.total_count),
            manual_count: count(bucket.manual_count),
            automated_count: count(bucket.automated_count),
        }
    }
}

impl From<HeatmapCell> for HeatmapCellResponse {
    fn from(cell: HeatmapCell) -> Self {
        Self {
            asset: cell.asset,
            network: cell.network,
            count: count(cell.count),
            last_update: cell.last_update.to_rfc3339(),
        }
    }
}

impl From<ActivityLeader> for ActivityLeaderResponse {
    fn from(leader: ActivityLeader) -> Self {
        Self {
            label: leader.label,
            count: count(leader.count),
        }
    }
}

impl From<SummaryStats> for SummaryStatsResponse {
    fn from(stats: SummaryStats) -> Self {
        Self {
            total_count: count(stats.total_count),
            count_today: count(stats.count_today),
            most_active_asset: stats.most_active_asset.map(ActivityLeaderResponse::from),
            most_active_network: stats.most_active_network.map(ActivityLeaderResponse::from),
            mean_interval_hours: round2(stats.mean_interval_hours),
            success_rate_percent: round2(stats.success_rate_percent),
            automation_rate_percent: round2(stats.automation_rate_percent),
            critical_count: count(stats.critical_count),
        }
    }
}

impl From<NetworkActivity> for NetworkActivityResponse {
    fn from(activity: NetworkActivity) -> Self {
        Self {
            active_networks: count(activity.active_networks),
            manual_count: count(activity.manual_count),
            automated_count: count(activity.automated_count),
            success_count: count(activity.success_count),
            failed_count: count(activity.failed_count),
        }
    }
}

fn count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Percentages and intervals leave the engine raw; the wire carries two
/// decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
