//! Services built on top of the graph store collaborators

pub mod catalog;
pub mod loader;
pub mod normalizer;
pub mod statements;

pub use catalog::{CatalogView, CharacterCatalog, TableDataAvailability, WriteOutcome};
pub use loader::DatasetLoader;
pub use normalizer::normalize;
pub use statements::{StatementBuilder, Vocabulary};
