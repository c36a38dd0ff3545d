// medallion-core/src/application/pipeline.rs
//
// Bronze -> Silver -> Gold in one pass:
// read, normalize, enrich, filter + aggregate, replace.

use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::application::report::RunReport;
use crate::domain::aggregate::Aggregator;
use crate::domain::error::DomainError;
use crate::domain::lookup::LookupRules;
use crate::domain::normalize::{CategoricalDefaults, Normalizer};
use crate::domain::project::PipelineSettings;
use crate::error::MedallionError;
use crate::ports::store::{GoldStore, RawStore, SilverStore};

/// Stores and rules for one run.
pub struct PipelineContext<'a> {
    pub raw: &'a dyn RawStore,
    pub silver: Option<&'a dyn SilverStore>,
    pub gold: &'a dyn GoldStore,
    pub rules: &'a LookupRules,
    pub normalizer: Normalizer,
    pub aggregator: Aggregator,
    /// Fraction in 0.0..=1.0; `None` accepts any number of rejected rows.
    pub max_rejected_ratio: Option<f64>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(raw: &'a dyn RawStore, gold: &'a dyn GoldStore, rules: &'a LookupRules) -> Self {
        Self {
            raw,
            silver: None,
            gold,
            rules,
            normalizer: Normalizer::default(),
            aggregator: Aggregator::default(),
            max_rejected_ratio: None,
        }
    }

    pub fn with_silver(mut self, silver: &'a dyn SilverStore) -> Self {
        self.silver = Some(silver);
        self
    }

    pub fn with_settings(mut self, settings: &PipelineSettings, defaults: &CategoricalDefaults) -> Self {
        self.normalizer = Normalizer::new(defaults.clone());
        self.aggregator = Aggregator::new(settings.include_entity.clone());
        self.max_rejected_ratio = settings.max_rejected_ratio;
        self
    }
}

/// Runs the pipeline and fills `report`, including on failure.
///
/// Nothing is written when reading or the rejection threshold fails. A store
/// failure leaves the Gold table at its previous snapshot.
///
/// Silver and Gold are replaced in separate transactions, Silver first. If
/// the Gold write fails after Silver committed, Silver holds this run's
/// snapshot while Gold keeps the previous one; `report.silver_written` and
/// `report.gold_written` tell the two apart and the next successful run
/// realigns them.
#[instrument(skip_all)]
pub async fn run_pipeline(
    ctx: &PipelineContext<'_>,
    report: &mut RunReport,
) -> Result<(), MedallionError> {
    let start = Instant::now();
    report.started_at = chrono::Utc::now().to_rfc3339();

    let result = execute(ctx, report).await;

    report.duration_secs = start.elapsed().as_secs_f64();
    report.success = result.is_ok();
    report.error = result.as_ref().err().map(|e| e.to_string());
    if let Err(e) = &result {
        warn!(error = %e, "Pipeline failed");
    }
    result
}

async fn execute(ctx: &PipelineContext<'_>, report: &mut RunReport) -> Result<(), MedallionError> {
    // 1. Bronze
    let raw = ctx.raw.read_all().await?;
    report.raw_rows = raw.len();

    // 2. Silver
    let outcome = ctx.normalizer.normalize(&raw);
    report.normalized_rows = outcome.records.len();
    report.rejected = outcome.rejected;
    if !report.rejected.is_empty() {
        warn!(rejected = report.rejected.len(), "Rows excluded during normalization");
    }
    check_rejections(report, ctx.max_rejected_ratio)?;

    // 3. Enrich + Gold
    let enriched = ctx.rules.enrich_all(outcome.records.clone());
    let gold = ctx.aggregator.aggregate(&enriched);
    report.excluded_rows = enriched.iter().filter(|r| !ctx.aggregator.includes(r)).count();
    report.gold_rows = gold.len();
    report.unclassified_region = gold
        .iter()
        .filter(|r| r.region == ctx.rules.regions.fallback())
        .count();
    report.uncategorized = gold
        .iter()
        .filter(|r| r.category == ctx.rules.categories.fallback())
        .count();

    // 4. Persist
    if let Some(silver) = ctx.silver {
        silver.replace_silver(&outcome.records).await?;
        report.silver_written = true;
    }
    ctx.gold.replace_all(&gold).await?;
    report.gold_written = true;

    info!(
        raw = report.raw_rows,
        normalized = report.normalized_rows,
        rejected = report.rejected.len(),
        gold = report.gold_rows,
        "Pipeline complete"
    );
    Ok(())
}

fn check_rejections(report: &RunReport, threshold: Option<f64>) -> Result<(), MedallionError> {
    let Some(threshold) = threshold else {
        return Ok(());
    };
    let ratio = report.rejected_ratio();
    if ratio > threshold {
        return Err(DomainError::RejectionThresholdExceeded {
            rejected: report.rejected.len(),
            total: report.raw_rows,
            ratio: ratio * 100.0,
            threshold: threshold * 100.0,
        }
        .into());
    }
    Ok(())
}
