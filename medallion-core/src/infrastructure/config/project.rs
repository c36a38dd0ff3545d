// medallion-core/src/infrastructure/config/project.rs

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["medallion_project.yaml", "medallion.yaml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read project config at {:?}", config_path))?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse project config YAML at {:?}", config_path))?;

    // MEDALLION_WAREHOUSE=/tmp/prod.duckdb medallion run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    check_config(&config)?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("MEDALLION_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = var("MEDALLION_WAREHOUSE") {
        info!(old = ?config.warehouse, new = ?val, "Overriding warehouse via ENV");
        config.warehouse = val;
    }
}

fn check_config(config: &ProjectConfig) -> Result<(), InfrastructureError> {
    if let Some(ratio) = config.pipeline.max_rejected_ratio
        && !(0.0..=1.0).contains(&ratio)
    {
        return Err(InfrastructureError::ConfigError(format!(
            "pipeline.max-rejected-ratio must be between 0.0 and 1.0, got {}",
            ratio
        )));
    }

    if let Some(silver) = &config.silver
        && (silver.table == config.gold.table || silver.table == config.bronze.table)
    {
        return Err(InfrastructureError::ConfigError(format!(
            "silver table '{}' collides with another layer",
            silver.table
        )));
    }
    if config.gold.table == config.bronze.table {
        return Err(InfrastructureError::ConfigError(format!(
            "gold table '{}' would overwrite the bronze table",
            config.gold.table
        )));
    }

    for key in config.bronze.unknown_columns() {
        warn!(column = %key, "Ignoring unknown field under bronze.columns");
    }
    Ok(())
}
