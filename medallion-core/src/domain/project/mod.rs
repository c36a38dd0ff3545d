pub mod configuration;

pub use configuration::{
    BronzeConfig, LayerConfig, LookupPaths, PipelineSettings, ProjectConfig, ValidationMode,
};
