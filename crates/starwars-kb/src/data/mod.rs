//! Core data structures for the character catalog

pub mod types;
pub mod trace_context;
pub mod entities;
pub mod errors;

// Re-export all common types
pub use types::{local_name, Binding, BoundTerm, MutationStatement, SelectResults, TermKind};
pub use trace_context::TraceContext;
pub use errors::{CoreError, NormalizeError, StatementError, StoreError};
pub use entities::*;
