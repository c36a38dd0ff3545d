// medallion-core/src/application/report.rs

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::normalize::DecodeError;
use crate::error::MedallionError;
use crate::infrastructure::fs::write_json;

pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Summary of one pipeline run, persisted as `target/run_results.json`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub success: bool,
    pub started_at: String,
    pub duration_secs: f64,
    pub raw_rows: usize,
    pub normalized_rows: usize,
    pub rejected: Vec<DecodeError>,
    /// Normalized rows dropped by the entity filter.
    pub excluded_rows: usize,
    pub gold_rows: usize,
    /// Gold rows carrying the region sentinel.
    pub unclassified_region: usize,
    /// Gold rows carrying the category sentinel.
    pub uncategorized: usize,
    pub silver_written: bool,
    pub gold_written: bool,
    pub error: Option<String>,
}

impl RunReport {
    pub fn rejected_ratio(&self) -> f64 {
        if self.raw_rows == 0 {
            0.0
        } else {
            self.rejected.len() as f64 / self.raw_rows as f64
        }
    }
}

pub fn save_run_report(target_dir: &Path, report: &RunReport) -> Result<PathBuf, MedallionError> {
    let path = target_dir.join(RUN_RESULTS_FILE);
    write_json(&path, report)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RawField;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_report_is_written_as_json() -> Result<()> {
        let dir = tempdir()?;
        let report = RunReport {
            raw_rows: 4,
            rejected: vec![DecodeError::Missing {
                row: 3,
                field: RawField::OrderValue,
            }],
            ..Default::default()
        };
        assert_eq!(report.rejected_ratio(), 0.25);

        let path = save_run_report(&dir.path().join("target"), &report)?;
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(json["success"], false);
        assert_eq!(json["rejected"][0]["kind"], "missing");
        assert_eq!(json["rejected"][0]["field"], "order_value");
        assert_eq!(json["rejected"][0]["row"], 3);
        Ok(())
    }

    #[test]
    fn test_empty_run_has_zero_ratio() {
        assert_eq!(RunReport::default().rejected_ratio(), 0.0);
    }
}
