use stewardlens_core::AppResult;
use stewardlens_domain::UpdateRecord;

/// Source of the update collection the engine operates on.
///
/// The contract is provenance-agnostic: the current implementations are
/// in-memory, but a real ingestion adapter can stand behind the same trait
/// without touching the engine. Implementations perform any I/O before
/// returning; the engine itself never blocks.
pub trait UpdateFeed: Send + Sync {
    /// Returns the full update collection.
    fn updates(&self) -> AppResult<Vec<UpdateRecord>>;
}
