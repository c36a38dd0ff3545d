// medallion-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Lookup conflict: {0}")]
    #[diagnostic(
        code(medallion::domain::lookup_conflict),
        help("Remove the duplicated entries, or set `lookups.validation: warn` to rely on first-match priority.")
    )]
    LookupConflict(String),

    #[error(
        "Too many rejected rows: {rejected} of {total} ({ratio:.2}%) exceeds the {threshold:.2}% threshold"
    )]
    #[diagnostic(
        code(medallion::domain::rejection_threshold),
        help("Inspect `rejected` in target/run_results.json; the Gold table was left untouched.")
    )]
    RejectionThresholdExceeded {
        rejected: usize,
        total: usize,
        ratio: f64,
        threshold: f64,
    },
}
