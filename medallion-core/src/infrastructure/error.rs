// medallion-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(medallion::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Table '{table}' is missing columns: {}", .missing.join(", "))]
    #[diagnostic(
        code(medallion::infra::database::schema),
        help("Check the export headers or remap them under `bronze.columns`.")
    )]
    SchemaMismatch { table: String, missing: Vec<String> },

    #[error("Table '{0}' does not exist")]
    #[diagnostic(code(medallion::infra::database::table_not_found))]
    TableNotFound(String),

    #[error("Warehouse lock poisoned")]
    #[diagnostic(code(medallion::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(medallion::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(medallion::infra::json))]
    Json(#[from] serde_json::Error),

    // --- CONFIG / YAML ---
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(medallion::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Invalid lookup table '{table}': {source}")]
    #[diagnostic(
        code(medallion::infra::lookup),
        help("Every rule needs a non-empty source/pattern and result.")
    )]
    InvalidLookup {
        table: String,
        source: validator::ValidationErrors,
    },
}

// Shortcut for `?` on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

// `anyhow::Context` is used while reading config files
impl From<anyhow::Error> for InfrastructureError {
    fn from(err: anyhow::Error) -> Self {
        InfrastructureError::ConfigError(format!("{:#}", err))
    }
}
