//! Wire-level types for SPARQL query results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One row of a SELECT result: variable name to bound term.
pub type Binding = HashMap<String, BoundTerm>;

/// Kind of an RDF term as reported in SPARQL 1.1 JSON results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    #[serde(rename = "uri")]
    Uri,
    #[serde(rename = "literal", alias = "typed-literal")]
    Literal,
    #[serde(rename = "bnode")]
    BlankNode,
}

/// A typed value bound to a result variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundTerm {
    #[serde(rename = "type")]
    pub kind: TermKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl BoundTerm {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Uri,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            datatype: Some(datatype.into()),
            lang: None,
        }
    }

    /// The value as shown to users: URIs collapse to their local name,
    /// everything else is returned untouched.
    pub fn display_value(&self) -> &str {
        match self.kind {
            TermKind::Uri => local_name(&self.value),
            TermKind::Literal | TermKind::BlankNode => &self.value,
        }
    }
}

/// Returns the segment after the last `/` or `#` of an identifier.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(|c| c == '/' || c == '#') {
        Some(idx) => &iri[idx + 1..],
        None => iri,
    }
}

/// `head` section of a SPARQL JSON result document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

/// `results` section of a SPARQL JSON result document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRows {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// Full `application/sparql-results+json` document for a SELECT query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectResults {
    #[serde(default)]
    pub head: ResultHead,
    #[serde(default)]
    pub results: ResultRows,
}

impl SelectResults {
    pub fn into_bindings(self) -> Vec<Binding> {
        self.results.bindings
    }
}

/// A complete SPARQL Update request, ready to submit unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MutationStatement(String);

impl MutationStatement {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MutationStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
