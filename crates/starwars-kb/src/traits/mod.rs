//! Core traits (interfaces) for the character catalog

pub mod query_executor;

pub use query_executor::{QueryExecutor, StoreAdmin};

#[cfg(feature = "mocks")]
pub use query_executor::{MockQueryExecutor, MockStoreAdmin};
