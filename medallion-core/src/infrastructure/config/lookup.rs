// medallion-core/src/infrastructure/config/lookup.rs
//
// The reference lookup tables ship inside the binary. A project can point
// `lookups.rename`, `lookups.regions` or `lookups.categories` at its own file
// to replace one of them.

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::lookup::{
    CategoryClassifier, CategoryRule, LookupRules, RegionClassifier, RegionRule, RenameResolver,
    RenameRule, UNCATEGORIZED, UNCLASSIFIED_REGION,
};
use crate::domain::project::LookupPaths;
use crate::infrastructure::error::InfrastructureError;

const EMBEDDED_RENAME: &str = include_str!("../../../resources/lookups/rename.yaml");
const EMBEDDED_REGIONS: &str = include_str!("../../../resources/lookups/regions.yaml");
const EMBEDDED_CATEGORIES: &str = include_str!("../../../resources/lookups/categories.yaml");

#[derive(Deserialize)]
struct RenameFile {
    #[serde(default)]
    rules: Vec<RenameRule>,
}

#[derive(Deserialize)]
struct RegionFile {
    #[serde(default = "default_region_fallback")]
    fallback: String,
    #[serde(default)]
    rules: Vec<RegionRule>,
}

#[derive(Deserialize)]
struct CategoryFile {
    #[serde(default = "default_category_fallback")]
    fallback: String,
    #[serde(default)]
    rules: Vec<CategoryRule>,
}

fn default_region_fallback() -> String {
    UNCLASSIFIED_REGION.to_string()
}
fn default_category_fallback() -> String {
    UNCATEGORIZED.to_string()
}

/// The tables bundled with the crate.
pub fn default_lookup_rules() -> Result<LookupRules, InfrastructureError> {
    build_rules(EMBEDDED_RENAME, EMBEDDED_REGIONS, EMBEDDED_CATEGORIES)
}

#[instrument(skip(project_dir, paths))]
pub fn load_lookup_rules(
    project_dir: &Path,
    paths: &LookupPaths,
) -> Result<LookupRules, InfrastructureError> {
    let rename = read_table(project_dir, paths.rename.as_deref(), EMBEDDED_RENAME)?;
    let regions = read_table(project_dir, paths.regions.as_deref(), EMBEDDED_REGIONS)?;
    let categories = read_table(project_dir, paths.categories.as_deref(), EMBEDDED_CATEGORIES)?;

    let rules = build_rules(&rename, &regions, &categories)?;
    info!(
        rename = rules.rename.rules().len(),
        regions = rules.regions.rules().len(),
        categories = rules.categories.rules().len(),
        "Lookup tables loaded"
    );
    Ok(rules)
}

fn read_table(
    project_dir: &Path,
    path: Option<&str>,
    embedded: &str,
) -> Result<String, InfrastructureError> {
    match path {
        Some(relative) => {
            let full = project_dir.join(relative);
            debug!(path = ?full, "Reading lookup override");
            let content = fs::read_to_string(&full)
                .with_context(|| format!("Failed to read lookup table at {:?}", full))?;
            Ok(content)
        }
        None => Ok(embedded.to_string()),
    }
}

fn build_rules(
    rename: &str,
    regions: &str,
    categories: &str,
) -> Result<LookupRules, InfrastructureError> {
    let rename: RenameFile = parse("rename", rename)?;
    validate_rules("rename", &rename.rules)?;

    let regions: RegionFile = parse("regions", regions)?;
    validate_rules("regions", &regions.rules)?;

    let categories: CategoryFile = parse("categories", categories)?;
    validate_rules("categories", &categories.rules)?;

    Ok(LookupRules::new(
        RenameResolver::new(rename.rules),
        RegionClassifier::new(regions.rules, regions.fallback),
        CategoryClassifier::new(categories.rules, categories.fallback),
    ))
}

fn parse<T: DeserializeOwned>(table: &str, content: &str) -> Result<T, InfrastructureError> {
    serde_yaml::from_str(content)
        .with_context(|| format!("Failed to parse {} lookup table", table))
        .map_err(Into::into)
}

fn validate_rules<T: Validate>(table: &str, rules: &[T]) -> Result<(), InfrastructureError> {
    for (index, rule) in rules.iter().enumerate() {
        rule.validate()
            .map_err(|source| InfrastructureError::InvalidLookup {
                table: format!("{}[{}]", table, index),
                source,
            })?;
    }
    Ok(())
}
