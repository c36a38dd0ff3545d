// medallion/src/commands/clean.rs
//
// USE CASE: Clean build artifacts.

use std::path::PathBuf;

use medallion_core::application::clean_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    match clean_project(&project_dir) {
        Ok(removed) => {
            for path in &removed {
                println!("   🗑️  Artifact removed: {}", path);
            }
            if removed.is_empty() {
                println!("✨ Nothing to clean.");
            }
        }
        Err(e) => {
            eprintln!("❌ Clean failed: {:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    }
    Ok(())
}
