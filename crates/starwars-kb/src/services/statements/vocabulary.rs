//! Resource names of the Star Wars dataset

use crate::data::errors::StatementError;
use crate::services::statements::terms::Iri;

/// Namespace every character, kind, planet and movie lives in by default.
pub const DEFAULT_NAMESPACE: &str = "http://api.stardog.com/";

const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// Properties asserted about a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Id,
    Name,
    AppearsIn,
    HomePlanet,
}

impl Predicate {
    pub fn local_name(&self) -> &'static str {
        match self {
            Predicate::Id => "id",
            Predicate::Name => "name",
            Predicate::AppearsIn => "appearsIn",
            Predicate::HomePlanet => "homePlanet",
        }
    }
}

/// Maps local names to full IRIs under one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    namespace: String,
}

impl Vocabulary {
    pub fn new(namespace: impl Into<String>) -> Result<Self, StatementError> {
        let namespace = namespace.into();
        Iri::parse(namespace.as_str())?;
        Ok(Self { namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// IRI of a dataset resource given its local name.
    pub fn resource(&self, local_name: &str) -> Result<Iri, StatementError> {
        if local_name.is_empty() {
            return Err(StatementError::InvalidIri(local_name.to_string()));
        }
        Iri::parse(format!("{}{}", self.namespace, local_name))
            .map_err(|_| StatementError::InvalidIri(local_name.to_string()))
    }

    pub fn predicate(&self, predicate: Predicate) -> Iri {
        self.fixed(predicate.local_name())
    }

    pub fn character_class(&self) -> Iri {
        self.fixed("Character")
    }

    // Namespace was validated on construction and fixed names are plain ASCII.
    fn fixed(&self, local_name: &'static str) -> Iri {
        Iri(format!("{}{}", self.namespace, local_name))
    }

    /// The fixed read query: one row per character per movie.
    pub fn select_characters_query(&self) -> String {
        format!(
            "SELECT DISTINCT ?id ?name ?homePlanet ?kind ?movie\n\
             WHERE {{\n  \
               ?subject a ?kind .\n  \
               ?kind <{subclass}> {character} .\n  \
               ?subject {id} ?id .\n  \
               ?subject {name} ?name .\n  \
               ?subject {appears_in} ?movie .\n  \
               OPTIONAL {{ ?subject {home_planet} ?homePlanet . }}\n\
             }}\n",
            subclass = RDFS_SUBCLASS_OF,
            character = self.character_class(),
            id = self.predicate(Predicate::Id),
            name = self.predicate(Predicate::Name),
            appears_in = self.predicate(Predicate::AppearsIn),
            home_planet = self.predicate(Predicate::HomePlanet),
        )
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}
