// medallion-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path};

use crate::error::MedallionError;
use crate::infrastructure::config::load_project_config;

/// Removes the project's `clean-targets`. Returns the paths actually removed.
pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, MedallionError> {
    tracing::info!("🧹 Initializing cleanup sequence...");

    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets
    };

    let mut removed = Vec::new();
    for target_rel_path in targets {
        // Only plain relative paths below the project directory.
        let relative = Path::new(&target_rel_path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || target_rel_path.trim().is_empty() {
            return Err(MedallionError::UnsafePath(target_rel_path));
        }

        let full_path = project_dir.join(relative);
        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}
