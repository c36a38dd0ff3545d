pub mod duckdb;
pub mod memory;

pub use self::duckdb::DuckDbWarehouse;
pub use memory::InMemoryWarehouse;
