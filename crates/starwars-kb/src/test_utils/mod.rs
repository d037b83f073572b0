//! Test doubles for the graph store collaborators

pub mod fake_store;
pub use fake_store::{character_binding, FakeGraphStore};

#[cfg(feature = "mocks")]
pub use crate::traits::{MockQueryExecutor, MockStoreAdmin};
