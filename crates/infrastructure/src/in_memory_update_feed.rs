use stewardlens_application::UpdateFeed;
use stewardlens_core::AppResult;
use stewardlens_domain::UpdateRecord;

/// Update feed backed by a fixed in-memory collection.
///
/// Used by tests and by embedders that assemble records themselves.
pub struct InMemoryUpdateFeed {
    records: Vec<UpdateRecord>,
}

impl InMemoryUpdateFeed {
    /// Creates a feed over an already-validated collection.
    #[must_use]
    pub fn new(records: Vec<UpdateRecord>) -> Self {
        Self { records }
    }
}

impl UpdateFeed for InMemoryUpdateFeed {
    fn updates(&self) -> AppResult<Vec<UpdateRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stewardlens_application::UpdateFeed;
    use stewardlens_domain::{Asset, Network, Outcome, ParameterKind, StewardKind, UpdateRecord};

    use super::InMemoryUpdateFeed;

    #[test]
    fn returns_the_collection_unchanged() {
        let record = UpdateRecord::new(
            "update-1",
            Utc::now(),
            Network::new("base", "Base", 8453, None).unwrap_or_else(|_| unreachable!()),
            Asset::new("USDC", "USD Coin", None).unwrap_or_else(|_| unreachable!()),
            ParameterKind::SupplyCap,
            StewardKind::Manual,
            "1000000 USDC",
            "2000000 USDC",
            "0xfeed",
            Outcome::Success,
        )
        .unwrap_or_else(|_| unreachable!());

        let feed = InMemoryUpdateFeed::new(vec![record.clone()]);
        let listed = feed.updates().unwrap_or_else(|_| unreachable!());
        assert_eq!(listed, vec![record]);
    }
}
