//! Database module for the PostgreSQL connection used by the smoke-test route.

mod pool;

pub use pool::DatabasePool;
