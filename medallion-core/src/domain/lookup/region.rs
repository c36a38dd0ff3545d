// medallion-core/src/domain/lookup/region.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

use super::table::{Rule, RuleTable};

pub const UNCLASSIFIED_REGION: &str = "Estado não identificado";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct RegionRule {
    #[validate(length(min = 1, message = "Region code cannot be empty"))]
    pub region: String,
    #[validate(length(min = 1, message = "A region needs at least one entity id"))]
    pub ids: BTreeSet<i64>,
}

impl RegionRule {
    pub fn new(region: impl Into<String>, ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            region: region.into(),
            ids: ids.into_iter().collect(),
        }
    }
}

impl Rule for RegionRule {
    type Input = i64;

    fn matches(&self, input: &i64) -> bool {
        self.ids.contains(input)
    }

    fn output(&self) -> &str {
        &self.region
    }
}

/// An entity id listed by more than one region rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOverlap {
    pub entity_id: i64,
    /// Region that wins under first-match priority.
    pub region: String,
    /// Later regions that also list the id and never apply to it.
    pub shadowed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RegionClassifier {
    table: RuleTable<RegionRule>,
    fallback: String,
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(Vec::new(), UNCLASSIFIED_REGION)
    }
}

impl RegionClassifier {
    pub fn new(rules: Vec<RegionRule>, fallback: impl Into<String>) -> Self {
        Self {
            table: RuleTable::new(rules),
            fallback: fallback.into(),
        }
    }

    /// Region of the first rule listing `entity_id`, or the fallback sentinel.
    pub fn classify(&self, entity_id: i64) -> &str {
        self.table
            .first_match(&entity_id)
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn rules(&self) -> &[RegionRule] {
        self.table.rules()
    }

    pub fn overlaps(&self) -> Vec<RegionOverlap> {
        let mut seen: BTreeMap<i64, RegionOverlap> = BTreeMap::new();
        let mut overlapping: BTreeSet<i64> = BTreeSet::new();

        for rule in self.table.rules() {
            for id in &rule.ids {
                match seen.get_mut(id) {
                    Some(entry) => {
                        entry.shadowed.push(rule.region.clone());
                        overlapping.insert(*id);
                    }
                    None => {
                        seen.insert(
                            *id,
                            RegionOverlap {
                                entity_id: *id,
                                region: rule.region.clone(),
                                shadowed: Vec::new(),
                            },
                        );
                    }
                }
            }
        }

        overlapping
            .into_iter()
            .filter_map(|id| seen.remove(&id))
            .collect()
    }
}
