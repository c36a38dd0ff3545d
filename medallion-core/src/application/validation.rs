// medallion-core/src/application/validation.rs
//
// Startup checks on the lookup tables. They never change how rows are
// classified: first match always wins at runtime.

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::lookup::{LookupRules, RegionOverlap, ShadowedRename};
use crate::domain::project::ValidationMode;
use crate::error::MedallionError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LookupReport {
    pub shadowed_renames: Vec<ShadowedRename>,
    pub region_overlaps: Vec<RegionOverlap>,
}

impl LookupReport {
    pub fn is_clean(&self) -> bool {
        self.shadowed_renames.is_empty() && self.region_overlaps.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        for s in &self.shadowed_renames {
            parts.push(format!(
                "rename rule #{} ('{}') is shadowed by rule #{}",
                s.index, s.source, s.shadowed_by
            ));
        }
        for o in &self.region_overlaps {
            parts.push(format!(
                "entity id {} is listed by {} and also {}",
                o.entity_id,
                o.region,
                o.shadowed.join(", ")
            ));
        }
        parts.join("; ")
    }
}

pub fn inspect_lookups(rules: &LookupRules) -> LookupReport {
    LookupReport {
        shadowed_renames: rules.rename.shadowed(),
        region_overlaps: rules.regions.overlaps(),
    }
}

pub fn validate_lookups(
    rules: &LookupRules,
    mode: ValidationMode,
) -> Result<LookupReport, MedallionError> {
    if mode == ValidationMode::Off {
        return Ok(LookupReport::default());
    }

    let report = inspect_lookups(rules);
    if report.is_clean() {
        info!("Lookup tables are conflict-free");
        return Ok(report);
    }

    if mode == ValidationMode::Strict {
        return Err(DomainError::LookupConflict(report.summary()).into());
    }

    for s in &report.shadowed_renames {
        warn!(rule = s.index, source = %s.source, shadowed_by = s.shadowed_by, "Unreachable rename rule");
    }
    for o in &report.region_overlaps {
        warn!(entity_id = o.entity_id, region = %o.region, shadowed = ?o.shadowed, "Entity id listed by several regions");
    }
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::lookup::{
        CategoryClassifier, RegionClassifier, RegionRule, RenameResolver, RenameRule,
        UNCLASSIFIED_REGION,
    };
    use anyhow::Result;

    fn conflicting() -> LookupRules {
        LookupRules::new(
            RenameResolver::new(vec![
                RenameRule::exact("A", "First"),
                RenameRule::exact("A", "Second"),
            ]),
            RegionClassifier::new(
                vec![RegionRule::new("CE", [1, 2]), RegionRule::new("PE", [2, 3])],
                UNCLASSIFIED_REGION,
            ),
            CategoryClassifier::default(),
        )
    }

    #[test]
    fn test_warn_mode_reports_conflicts() -> Result<()> {
        let report = validate_lookups(&conflicting(), ValidationMode::Warn)?;
        assert_eq!(report.shadowed_renames.len(), 1);
        assert_eq!(report.shadowed_renames[0].index, 1);
        assert_eq!(report.region_overlaps.len(), 1);
        assert_eq!(report.region_overlaps[0].entity_id, 2);
        assert_eq!(report.region_overlaps[0].region, "CE");
        Ok(())
    }

    #[test]
    fn test_strict_mode_fails() {
        let err = validate_lookups(&conflicting(), ValidationMode::Strict).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Lookup conflict"), "{message}");
        assert!(message.contains("entity id 2 is listed by CE and also PE"), "{message}");
    }

    #[test]
    fn test_off_mode_skips_checks() -> Result<()> {
        let report = validate_lookups(&conflicting(), ValidationMode::Off)?;
        assert!(report.is_clean());
        Ok(())
    }

    #[test]
    fn test_runtime_keeps_first_match_despite_conflicts() {
        let rules = conflicting();
        assert_eq!(rules.regions.classify(2), "CE");
        assert_eq!(rules.rename.resolve("A"), "First");
    }
}
