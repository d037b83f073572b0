//! Error types for the character catalog

use thiserror::Error;

use crate::data::TraceContext;

/// Base Error type for catalog operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Result normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Invalid edit: {0}")]
    Statement(#[from] StatementError),

    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),

    #[error("Store error with context: {message}")]
    StoreWithContext {
        message: String,
        database: String,
        trace_id: Option<String>,
        #[source]
        source: StoreError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Helper to attach the database and trace to a store failure
    pub fn store_with_context(
        message: impl Into<String>,
        database: impl Into<String>,
        trace_ctx: Option<&TraceContext>,
        source: StoreError,
    ) -> Self {
        CoreError::StoreWithContext {
            message: message.into(),
            database: database.into(),
            trace_id: trace_ctx.map(|ctx| ctx.trace_id.clone()),
            source,
        }
    }
}

/// A result row broke the shape the read query guarantees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Binding is missing required variable `{field}`")]
    MissingField { field: &'static str },

    #[error("Character id `{value}` is not an integer")]
    InvalidId { value: String },
}

/// Edit input that cannot be turned into a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("A value for `{field}` is required")]
    MissingValue { field: &'static str },

    #[error("`{0}` cannot be used as a resource name")]
    InvalidIri(String),

    #[error("`{0}` is not a valid character id")]
    InvalidIdentifier(String),

    #[error("Unknown character field `{0}`")]
    UnknownField(String),
}

/// Specific error type for the graph store (SPARQL endpoint interaction).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Graph store connection error: {0}")]
    ConnectionError(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Store rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Data mapping error from store result: {0}")]
    MappingError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown store error: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_error_display() {
        let error = NormalizeError::MissingField { field: "id" };
        assert_eq!(format!("{}", error), "Binding is missing required variable `id`");
    }

    #[test]
    fn test_store_error_display() {
        let error = StoreError::Rejected { status: 400, body: "bad query".into() };
        assert_eq!(format!("{}", error), "Store rejected the request with status 400: bad query");
    }

    #[test]
    fn test_statement_error_converts_to_core_error() {
        let error: CoreError = StatementError::InvalidIri("A New Hope".into()).into();
        assert_eq!(format!("{}", error), "Invalid edit: `A New Hope` cannot be used as a resource name");
    }

    #[test]
    fn test_core_error_wraps_each_layer() {
        let normalize: CoreError = NormalizeError::InvalidId { value: "one".into() }.into();
        assert!(matches!(normalize, CoreError::Normalize(_)));

        let store: CoreError = StoreError::Unknown("reset".into()).into();
        assert_eq!(format!("{}", store), "Graph store error: Unknown store error: reset");
    }

    #[test]
    fn test_error_with_context() {
        let trace_ctx = TraceContext::new_root();

        let error = CoreError::store_with_context(
            "Character update failed",
            "starwars",
            Some(&trace_ctx),
            StoreError::ConnectionError("refused".into()),
        );

        match error {
            CoreError::StoreWithContext { message, database, trace_id, source } => {
                assert_eq!(message, "Character update failed");
                assert_eq!(database, "starwars");
                assert_eq!(trace_id, Some(trace_ctx.trace_id.clone()));
                assert!(matches!(source, StoreError::ConnectionError(_)));
            }
            _ => panic!("Expected StoreWithContext"),
        }
    }
}
