// src/ports/mod.rs

pub mod store;

pub use store::{GoldStore, RawStore, SilverStore};
