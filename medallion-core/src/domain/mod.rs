pub mod aggregate;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod project;
pub mod record;

// Handy re-exports to keep imports short elsewhere
pub use aggregate::Aggregator;
pub use error::DomainError;
pub use lookup::LookupRules;
pub use normalize::{NormalizeOutcome, Normalizer};
