//! Collaborator traits for talking to the graph store

use async_trait::async_trait;

use crate::data::{
    errors::StoreError,
    trace_context::TraceContext,
    types::{Binding, MutationStatement},
};

/// Executes SPARQL against a named database of the graph store.
///
/// The implementing value is the connection handle; the database name is
/// passed with every call so one handle can address several stores.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs a SELECT query and returns its result rows.
    async fn select(
        &self,
        trace_ctx: &TraceContext,
        database: &str,
        query: &str,
    ) -> Result<Vec<Binding>, StoreError>;

    /// Submits an update. `Ok` means the store acknowledged it.
    async fn update(
        &self,
        trace_ctx: &TraceContext,
        database: &str,
        statement: &MutationStatement,
    ) -> Result<(), StoreError>;
}

/// Database lifecycle operations, used when (re)loading the dataset.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait StoreAdmin: Send + Sync {
    async fn drop_database(&self, trace_ctx: &TraceContext, database: &str) -> Result<(), StoreError>;

    async fn create_database(&self, trace_ctx: &TraceContext, database: &str) -> Result<(), StoreError>;
}
