//! SPARQL Update construction for character edits

pub mod builder;
pub mod terms;
pub mod vocabulary;

pub use builder::{bulk_insert, split_movie_list, subject_local_name, StatementBuilder};
pub use terms::{Iri, Term};
pub use vocabulary::{Predicate, Vocabulary, DEFAULT_NAMESPACE};
