//! Star Wars character catalog over a Stardog graph store
//!
//! Reads characters with a fixed SPARQL query, folds the flat result rows
//! into one record per character, and turns user edits into SPARQL Update
//! statements built from escaped, validated terms.

// Core modules
pub mod config;
pub mod data;
pub mod services;
pub mod traits;

// Stardog HTTP adapter (optional, any QueryExecutor can be supplied instead)
#[cfg(feature = "adapters")]
pub mod adapters;

// Testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenient usage
pub use config::StoreConfig;
pub use data::entities::{
    CharacterDraft, CharacterField, ColumnSpec, EditIntent, EntityRecord, COLUMNS,
};
pub use data::errors::{CoreError, NormalizeError, StatementError, StoreError};
pub use data::trace_context::TraceContext;
pub use data::types::{Binding, BoundTerm, MutationStatement, SelectResults, TermKind};

// Re-export collaborator traits
pub use traits::{QueryExecutor, StoreAdmin};

// Re-export services
pub use services::{
    normalize, CatalogView, CharacterCatalog, DatasetLoader, StatementBuilder,
    TableDataAvailability, Vocabulary, WriteOutcome,
};

#[cfg(feature = "adapters")]
pub use adapters::StardogHttpClient;

/// Initialize tracing for the catalog
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. the configured
/// `LOG_LEVEL`) is used as the filter.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
