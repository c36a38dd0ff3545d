// medallion-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::record::{AggregatedRecord, NormalizedRecord, RawRecord};
use crate::error::MedallionError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::store::{GoldStore, RawStore, SilverStore};

/// Process-local stores for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryWarehouse {
    raw: Vec<RawRecord>,
    silver: Mutex<Option<Vec<NormalizedRecord>>>,
    gold: Mutex<Option<Vec<AggregatedRecord>>>,
    fail_writes: bool,
}

impl InMemoryWarehouse {
    pub fn new(raw: Vec<RawRecord>) -> Self {
        Self {
            raw,
            ..Default::default()
        }
    }

    /// Every write fails with an infrastructure error.
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn with_gold(self, rows: Vec<AggregatedRecord>) -> Self {
        if let Ok(mut gold) = self.gold.lock() {
            *gold = Some(rows);
        }
        self
    }

    pub fn gold(&self) -> Option<Vec<AggregatedRecord>> {
        self.gold.lock().ok().and_then(|g| g.clone())
    }

    pub fn silver(&self) -> Option<Vec<NormalizedRecord>> {
        self.silver.lock().ok().and_then(|s| s.clone())
    }

    fn check_writable(&self) -> Result<(), MedallionError> {
        if self.fail_writes {
            return Err(InfrastructureError::Io(std::io::Error::other("store is read-only")).into());
        }
        Ok(())
    }
}

fn poisoned() -> MedallionError {
    InfrastructureError::Database(DatabaseError::Poisoned).into()
}

#[async_trait]
impl RawStore for InMemoryWarehouse {
    async fn read_all(&self) -> Result<Vec<RawRecord>, MedallionError> {
        Ok(self.raw.clone())
    }
}

#[async_trait]
impl SilverStore for InMemoryWarehouse {
    async fn replace_silver(&self, records: &[NormalizedRecord]) -> Result<(), MedallionError> {
        self.check_writable()?;
        *self.silver.lock().map_err(|_| poisoned())? = Some(records.to_vec());
        Ok(())
    }
}

#[async_trait]
impl GoldStore for InMemoryWarehouse {
    async fn replace_all(&self, records: &[AggregatedRecord]) -> Result<(), MedallionError> {
        self.check_writable()?;
        *self.gold.lock().map_err(|_| poisoned())? = Some(records.to_vec());
        Ok(())
    }
}
