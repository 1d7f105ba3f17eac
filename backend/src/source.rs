use common::MedalTableEntry;

use crate::error::FetchError;

pub mod external;
pub mod mock;

pub use external::ExternalSource;
pub use mock::MockSource;

/// Where a cycle gets its medal table from.
#[async_trait::async_trait]
pub trait MedalSource: Send + Sync {
    /// Whether the data reflects real results. Only live data is persisted.
    fn is_live(&self) -> bool;

    async fn fetch(&self) -> Result<Vec<MedalTableEntry>, FetchError>;
}
