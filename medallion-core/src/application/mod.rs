// medallion-core/src/application/mod.rs

pub mod clean;
pub mod pipeline;
pub mod report;
pub mod validation;

// `use medallion_core::application::{run_pipeline, clean_project, ...};`
pub use clean::clean_project;
pub use pipeline::{PipelineContext, run_pipeline};
pub use report::{RunReport, save_run_report};
pub use validation::{LookupReport, inspect_lookups, validate_lookups};
