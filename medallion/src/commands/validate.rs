// medallion/src/commands/validate.rs
//
// USE CASE: Static checks on the lookup tables.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};
use medallion_core::application::inspect_lookups;
use medallion_core::domain::project::ValidationMode;
use medallion_core::infrastructure::config::{load_lookup_rules, load_project_config};

pub fn execute(project_dir: PathBuf, strict: bool) -> anyhow::Result<()> {
    println!("🧪 Validating lookup tables...");

    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    let rules = load_lookup_rules(&project_dir, &config.lookups)
        .context("Failed to load lookup tables")?;

    println!(
        "   Rules: {} rename, {} regions, {} categories",
        rules.rename.rules().len(),
        rules.regions.rules().len(),
        rules.categories.rules().len()
    );

    let report = inspect_lookups(&rules);

    if !report.shadowed_renames.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Rule #", "Source", "Shadowed by rule #"]);
        for s in &report.shadowed_renames {
            table.add_row(vec![
                s.index.to_string(),
                s.source.clone(),
                s.shadowed_by.to_string(),
            ]);
        }
        println!("\n⚠️  Unreachable rename rules:\n{table}");
    }

    if !report.region_overlaps.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Entity id", "Region (wins)", "Also listed by"]);
        for o in &report.region_overlaps {
            table.add_row(vec![
                o.entity_id.to_string(),
                o.region.clone(),
                o.shadowed.join(", "),
            ]);
        }
        println!("\n⚠️  Entity ids listed by several regions:\n{table}");
    }

    if report.is_clean() {
        println!("   ✅ No conflicts detected.");
        return Ok(());
    }

    if strict || config.lookups.validation == ValidationMode::Strict {
        eprintln!("\n💥 Strict mode: failing due to lookup conflicts.");
        std::process::exit(1);
    }
    Ok(())
}
