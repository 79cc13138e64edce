mod duckdb;

pub use self::duckdb::DuckDbDriver;
pub use self::in_memory_test::{
    InMemoryTestDriver, InMemoryTestResponseBuilder, QueryKind, RecordedQuery,
};
