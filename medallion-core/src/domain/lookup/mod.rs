// medallion-core/src/domain/lookup/mod.rs
//
// Static lookup tables: rename, region and category. Loaded once at start,
// immutable for the whole run.

pub mod category;
pub mod region;
pub mod rename;
pub mod table;

pub use category::{CategoryClassifier, CategoryRule, UNCATEGORIZED};
pub use region::{RegionClassifier, RegionOverlap, RegionRule, UNCLASSIFIED_REGION};
pub use rename::{MatchMode, RenameResolver, RenameRule, ShadowedRename};
pub use table::{Rule, RuleTable};

use serde::Serialize;

use crate::domain::record::{EnrichedRecord, NormalizedRecord};

/// Lookup results for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification<'a> {
    pub canonical_name: &'a str,
    pub region: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct LookupRules {
    pub rename: RenameResolver,
    pub regions: RegionClassifier,
    pub categories: CategoryClassifier,
}

impl LookupRules {
    pub fn new(
        rename: RenameResolver,
        regions: RegionClassifier,
        categories: CategoryClassifier,
    ) -> Self {
        Self {
            rename,
            regions,
            categories,
        }
    }

    /// Rename first, then categorize the canonical name.
    pub fn classify<'a>(&'a self, entity_name: &'a str, entity_id: i64) -> Classification<'a> {
        let canonical_name = self.rename.resolve(entity_name);
        Classification {
            canonical_name,
            region: self.regions.classify(entity_id),
            category: self.categories.categorize(canonical_name),
        }
    }

    pub fn enrich(&self, record: NormalizedRecord) -> EnrichedRecord {
        let c = self.classify(&record.entity_name, record.entity_id);
        let (canonical_name, region, category) = (
            c.canonical_name.to_string(),
            c.region.to_string(),
            c.category.to_string(),
        );
        EnrichedRecord {
            record,
            canonical_name,
            region,
            category,
        }
    }

    pub fn enrich_all(&self, records: Vec<NormalizedRecord>) -> Vec<EnrichedRecord> {
        records.into_iter().map(|r| self.enrich(r)).collect()
    }
}
