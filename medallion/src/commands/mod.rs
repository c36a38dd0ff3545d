// medallion/src/commands/mod.rs

pub mod clean;
pub mod explain;
pub mod inspect;
pub mod run;
pub mod validate;
