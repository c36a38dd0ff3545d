// medallion/src/commands/explain.rs
//
// USE CASE: Show the lookup results for a single entity.

use std::path::PathBuf;

use anyhow::Context;
use medallion_core::domain::aggregate::Aggregator;
use medallion_core::domain::project::PipelineSettings;
use medallion_core::infrastructure::config::{
    default_lookup_rules, load_lookup_rules, load_project_config,
};
use medallion_core::infrastructure::error::InfrastructureError;

pub fn execute(project_dir: PathBuf, name: String, id: i64) -> anyhow::Result<()> {
    // Outside a project the embedded tables and default settings apply.
    let (rules, settings) = match load_project_config(&project_dir) {
        Ok(config) => (
            load_lookup_rules(&project_dir, &config.lookups)
                .context("Failed to load lookup tables")?,
            config.pipeline,
        ),
        Err(InfrastructureError::ConfigNotFound(_)) => (
            default_lookup_rules().context("Failed to load embedded lookup tables")?,
            PipelineSettings::default(),
        ),
        Err(e) => return Err(e).context("Failed to load project configuration"),
    };

    let c = rules.classify(&name, id);
    let aggregator = Aggregator::new(settings.include_entity.clone());
    let reaches_gold = match (&settings.include_entity, aggregator.includes_name(&name)) {
        (None, _) => "yes (no filter)".to_string(),
        (Some(pattern), true) => format!("yes (matches \"{}\")", pattern),
        (Some(pattern), false) => format!("no (does not contain \"{}\")", pattern),
    };

    println!("raw name       : {}", name);
    println!("entity id      : {}", id);
    println!("canonical name : {}", c.canonical_name);
    println!("region         : {}", c.region);
    println!("category       : {}", c.category);
    println!("reaches gold   : {}", reaches_gold);

    Ok(())
}
