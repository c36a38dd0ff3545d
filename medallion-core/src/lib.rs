// medallion-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Store contracts: Bronze in, Silver and Gold out.
pub mod ports;

// 2. Domain (Business core)
// Records, normalization, lookup rules, aggregation.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB / in-memory warehouses, YAML configuration, filesystem helpers.
pub mod infrastructure;

// 4. Application (Use Cases)
// Pipeline orchestration, lookup validation, run reports.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::MedallionError;
