pub mod lookup;
pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use lookup::{default_lookup_rules, load_lookup_rules};
pub use project::load_project_config;
