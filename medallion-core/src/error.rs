// medallion-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum MedallionError {
    // --- DOMAIN ERRORS (lookup conflicts, rejection threshold) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (stores, IO, config parsing) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- APPLICATION ERRORS ---
    #[error("Unsafe path traversal detected: {0}")]
    #[diagnostic(
        code(medallion::unsafe_path),
        help("clean-targets must be relative paths inside the project directory.")
    )]
    UnsafePath(String),
}

impl From<std::io::Error> for MedallionError {
    fn from(err: std::io::Error) -> Self {
        MedallionError::Infrastructure(InfrastructureError::Io(err))
    }
}
