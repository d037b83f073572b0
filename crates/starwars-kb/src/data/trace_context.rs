//! Correlation ids for the store requests of one catalog operation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ids attached to every store request and span.
///
/// A CLI command starts one root context. Follow-up work, such as the reload
/// after a write, runs in a child that keeps the `trace_id` and points back
/// at the span that caused it through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    pub parent_id: Option<String>,
}

impl TraceContext {
    pub fn new_root() -> Self {
        let trace_id = Uuid::new_v4().to_string();
        Self {
            span_id: Uuid::new_v4().to_string(),
            trace_id,
            parent_id: None,
        }
    }

    pub fn new_child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: Uuid::new_v4().to_string(),
            parent_id: Some(self.span_id.clone()),
        }
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new_root()
    }
}
