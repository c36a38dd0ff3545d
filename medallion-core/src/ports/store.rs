// medallion-core/src/ports/store.rs

// The pipeline only knows these three contracts. Where the Bronze rows come
// from and where Silver/Gold land is decided by the adapters.

use crate::domain::record::{AggregatedRecord, NormalizedRecord, RawRecord};
use crate::error::MedallionError;
use async_trait::async_trait;

#[async_trait]
pub trait RawStore: Send + Sync {
    /// Every Bronze row, in export order.
    async fn read_all(&self) -> Result<Vec<RawRecord>, MedallionError>;
}

#[async_trait]
pub trait SilverStore: Send + Sync {
    /// Replaces the Silver dataset. Readers see the old or the new rows, never a mix.
    async fn replace_silver(&self, records: &[NormalizedRecord]) -> Result<(), MedallionError>;
}

#[async_trait]
pub trait GoldStore: Send + Sync {
    /// Replaces the Gold dataset. Readers see the old or the new rows, never a mix.
    async fn replace_all(&self, records: &[AggregatedRecord]) -> Result<(), MedallionError>;
}
