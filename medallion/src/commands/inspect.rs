// medallion/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use std::path::Path;

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};
use medallion_core::infrastructure::adapters::DuckDbWarehouse;

pub fn execute(db_path: String, table: String, limit: usize) -> anyhow::Result<()> {
    if !Path::new(&db_path).exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'medallion run'?",
            db_path
        );
    }

    let warehouse = DuckDbWarehouse::open(&db_path)
        .with_context(|| format!("Failed to open DuckDB at {}", db_path))?;

    println!("\n🔍 Inspecting Table: '{}'", table);

    let (columns, rows) = warehouse
        .sample(&table, limit)
        .with_context(|| format!("Failed to read '{}'", table))?;
    let total = warehouse
        .count_rows(&table)
        .with_context(|| format!("Failed to count rows of '{}'", table))?;

    println!("   Rows: {}", total);
    println!("   --- Sample (Limit {}) ---", limit);

    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_header(columns);
    for row in rows {
        out.add_row(
            row.into_iter()
                .map(|cell| cell.unwrap_or_else(|| "NULL".to_string())),
        );
    }
    println!("{out}");

    Ok(())
}
