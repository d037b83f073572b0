//! Typed SPARQL terms and the escaping writer behind every statement.
//!
//! Caller-supplied text only ever reaches a statement through [`Term`], so a
//! value can end up as a well-formed literal or IRI and nothing else.

use std::fmt::{self, Write};

use crate::data::errors::StatementError;

/// An absolute IRI whose characters are all legal inside `<...>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iri(pub(super) String);

impl Iri {
    pub fn parse(value: impl Into<String>) -> Result<Self, StatementError> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(is_iri_char) {
            return Err(StatementError::InvalidIri(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

// IRIREF production: no control/space characters and none of <>"{}|^`\
fn is_iri_char(c: char) -> bool {
    c > ' ' && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// One position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Iri(Iri),
    /// Plain string literal, escaped on output.
    Literal(String),
    Integer(i64),
    Variable(&'static str),
    /// The `a` keyword (`rdf:type`).
    TypeOf,
}

impl Term {
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => fmt::Display::fmt(iri, f),
            Term::Literal(value) => write_string_literal(f, value),
            Term::Integer(value) => write!(f, "{}", value),
            Term::Variable(name) => write!(f, "?{}", name),
            Term::TypeOf => f.write_str("a"),
        }
    }
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('"')
}

/// `subject predicate object[, object...] .`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub objects: Vec<Term>,
}

impl TriplePattern {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            objects: vec![object],
        }
    }

    pub fn with_objects(subject: Term, predicate: Term, objects: Vec<Term>) -> Self {
        Self {
            subject,
            predicate,
            objects,
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.subject, self.predicate)?;
        for (i, object) in self.objects.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", object)?;
        }
        f.write_str(" .")
    }
}

/// An element of a WHERE group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPattern {
    Triple(TriplePattern),
    Optional(TriplePattern),
}

impl fmt::Display for GroupPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupPattern::Triple(triple) => fmt::Display::fmt(triple, f),
            GroupPattern::Optional(triple) => write!(f, "OPTIONAL {{ {} }}", triple),
        }
    }
}

/// Writes `KEYWORD {` + one indented line per item + `}`.
pub(crate) fn write_block<T: fmt::Display>(out: &mut String, keyword: &str, items: &[T]) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{} {{", keyword);
    for item in items {
        let _ = writeln!(out, "  {}", item);
    }
    let _ = writeln!(out, "}}");
}
