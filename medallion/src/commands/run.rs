// medallion/src/commands/run.rs
//
// USE CASE: Run the Bronze -> Silver -> Gold pipeline.

use std::path::PathBuf;

use anyhow::Context;
use medallion_core::application::{
    PipelineContext, RunReport, run_pipeline, save_run_report, validate_lookups,
};
use medallion_core::infrastructure::adapters::DuckDbWarehouse;
use medallion_core::infrastructure::config::{load_lookup_rules, load_project_config};

/// Rejected rows printed before the summary line.
const REJECTED_PREVIEW: usize = 10;

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Config + lookups
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);
    tracing::debug!(?config, "Resolved project configuration");

    let rules = load_lookup_rules(&project_dir, &config.lookups)
        .context("Failed to load lookup tables")?;
    let lookup_report = match validate_lookups(&rules, config.lookups.validation) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n💥 {:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };
    if !lookup_report.is_clean() {
        println!(
            "   ⚠️  Lookup conflicts found, first match wins (see `medallion validate`): {}",
            lookup_report.summary()
        );
    }

    // B. Warehouse
    let db_path = project_dir.join(&config.warehouse);
    println!("   Warehouse: {} 🦆", db_path.display());
    let warehouse = DuckDbWarehouse::open(&db_path.to_string_lossy())
        .with_context(|| format!("Failed to open DuckDB at {}", db_path.display()))?
        .with_layers(
            config.bronze.clone(),
            config.silver.clone(),
            config.gold.clone(),
        );

    let mut ctx = PipelineContext::new(&warehouse, &warehouse, &rules)
        .with_settings(&config.pipeline, &config.defaults);
    if warehouse.has_silver() {
        ctx = ctx.with_silver(&warehouse);
    }

    // C. Pipeline
    println!("🟢 Processing Pipeline...");
    let mut report = RunReport::default();
    let result = run_pipeline(&ctx, &mut report).await;

    let target_dir = project_dir.join(&config.target_path);
    let report_path = save_run_report(&target_dir, &report)
        .with_context(|| format!("Failed to write run report in {:?}", target_dir))?;

    print_summary(&report);

    match result {
        Ok(()) => {
            println!("   📄 Report: {}", report_path.display());
            println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {:?}", miette::Report::new(e));
            eprintln!("   📄 Report: {}", report_path.display());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("   🥉 Bronze rows read:      {}", report.raw_rows);
    println!("   🥈 Silver rows kept:      {}", report.normalized_rows);
    if !report.rejected.is_empty() {
        println!(
            "   ⚠️  Rows rejected:        {} ({:.2}%)",
            report.rejected.len(),
            report.rejected_ratio() * 100.0
        );
        for err in report.rejected.iter().take(REJECTED_PREVIEW) {
            println!("      ➜ {}", err);
        }
        if report.rejected.len() > REJECTED_PREVIEW {
            println!(
                "      ➜ ... and {} more",
                report.rejected.len() - REJECTED_PREVIEW
            );
        }
    }
    println!("   🚫 Filtered out:          {}", report.excluded_rows);
    println!("   🥇 Gold rows:             {}", report.gold_rows);
    if report.unclassified_region > 0 || report.uncategorized > 0 {
        println!(
            "   ❔ Unmapped: {} without region, {} without category",
            report.unclassified_region, report.uncategorized
        );
    }
}
