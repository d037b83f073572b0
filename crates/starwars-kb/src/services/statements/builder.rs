use tracing::debug;

use crate::data::{
    entities::{CharacterDraft, CharacterField, EditIntent},
    errors::StatementError,
    types::MutationStatement,
};
use crate::services::statements::terms::{write_block, GroupPattern, Term, TriplePattern};
use crate::services::statements::vocabulary::{Predicate, Vocabulary};

const SUBJECT: Term = Term::Variable("subject");

/// Turns edit intents into SPARQL Update statements.
///
/// Every operation that can be a no-op returns `Ok(None)` when the edit would
/// not change the stored data.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    vocabulary: Vocabulary,
}

impl StatementBuilder {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Dispatches on the intent variant.
    pub fn build(&self, intent: &EditIntent) -> Result<Option<MutationStatement>, StatementError> {
        let statement = match intent {
            EditIntent::Create(draft) => Some(self.create(draft)?),
            EditIntent::Delete { id } => Some(self.delete(*id)),
            EditIntent::UpdateField { id, field, old_value, new_value } => {
                self.update_field(*id, *field, old_value.as_deref(), new_value)?
            }
            EditIntent::UpdateMovies { id, old_movies, new_movies } => {
                self.update_movies(*id, old_movies, new_movies)?
            }
        };

        if let Some(statement) = &statement {
            debug!(intent = intent.label(), statement = %statement, "Built mutation statement");
        }
        Ok(statement)
    }

    /// `INSERT DATA` for a brand new character.
    pub fn create(&self, draft: &CharacterDraft) -> Result<MutationStatement, StatementError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StatementError::MissingValue { field: "name" });
        }
        let kind = required(&draft.kind, "kind")?;
        let id = parse_id(&draft.id)?;

        let subject = Term::Iri(self.vocabulary.resource(&subject_local_name(name))?);
        let mut triples = vec![
            TriplePattern::new(subject.clone(), Term::TypeOf, self.resource(kind)?),
            TriplePattern::new(subject.clone(), self.predicate(Predicate::Id), Term::Integer(id)),
            TriplePattern::new(subject.clone(), self.predicate(Predicate::Name), Term::literal(name)),
        ];

        let movies = self.movie_terms(&split_movie_list(&draft.movies))?;
        if !movies.is_empty() {
            triples.push(TriplePattern::with_objects(
                subject.clone(),
                self.predicate(Predicate::AppearsIn),
                movies,
            ));
        }

        if let Some(planet) = draft.home_planet.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            triples.push(TriplePattern::new(
                subject,
                self.predicate(Predicate::HomePlanet),
                self.resource(planet)?,
            ));
        }

        let mut text = String::new();
        write_block(&mut text, "INSERT DATA", &triples);
        Ok(MutationStatement::new(text))
    }

    /// Removes every triple of the character with the given id.
    pub fn delete(&self, id: i64) -> MutationStatement {
        let everything = TriplePattern::new(
            SUBJECT,
            Term::Variable("predicate"),
            Term::Variable("object"),
        );

        let mut text = String::new();
        write_block(&mut text, "DELETE", &[everything.clone()]);
        write_block(
            &mut text,
            "WHERE",
            &[
                TriplePattern::new(SUBJECT, self.predicate(Predicate::Id), Term::Integer(id)),
                everything,
            ],
        );
        MutationStatement::new(text)
    }

    /// Replaces one single-valued field.
    pub fn update_field(
        &self,
        id: i64,
        field: CharacterField,
        old_value: Option<&str>,
        new_value: &str,
    ) -> Result<Option<MutationStatement>, StatementError> {
        let new_value = new_value.trim();
        let old_value = old_value.filter(|v| !v.is_empty());
        // Compare trimmed, but DELETE must match the stored text exactly.
        if old_value.map(str::trim) == Some(new_value) || (old_value.is_none() && new_value.is_empty()) {
            return Ok(None);
        }
        if new_value.is_empty() && !field.is_optional() {
            return Err(StatementError::MissingValue { field: field.selector() });
        }

        let predicate = match field {
            CharacterField::Kind => Term::TypeOf,
            CharacterField::Id => self.predicate(Predicate::Id),
            CharacterField::Name => self.predicate(Predicate::Name),
            CharacterField::HomePlanet => self.predicate(Predicate::HomePlanet),
        };

        let old_triple = old_value
            .map(|old| self.field_object(field, old))
            .transpose()?
            .map(|object| TriplePattern::new(SUBJECT, predicate.clone(), object));
        let new_triple = if new_value.is_empty() {
            None
        } else {
            let object = self.field_object(field, new_value)?;
            Some(TriplePattern::new(SUBJECT, predicate, object))
        };

        let mut where_clause = vec![TriplePattern::new(
            SUBJECT,
            self.predicate(Predicate::Id),
            Term::Integer(id),
        )];

        let mut text = String::new();
        if let Some(old_triple) = old_triple {
            write_block(&mut text, "DELETE", &[old_triple.clone()]);
            where_clause.push(old_triple);
        }
        if let Some(new_triple) = new_triple {
            write_block(&mut text, "INSERT", &[new_triple]);
        }
        write_block(&mut text, "WHERE", &where_clause);
        Ok(Some(MutationStatement::new(text)))
    }

    /// Replaces the whole movie list; order matters when comparing.
    pub fn update_movies(
        &self,
        id: i64,
        old_movies: &[String],
        new_movies: &str,
    ) -> Result<Option<MutationStatement>, StatementError> {
        let movies = split_movie_list(new_movies);
        if movies.as_slice() == old_movies {
            return Ok(None);
        }

        let appears_in = self.predicate(Predicate::AppearsIn);
        let current = TriplePattern::new(SUBJECT, appears_in.clone(), Term::Variable("movie"));
        let movie_terms = self.movie_terms(&movies)?;

        let mut text = String::new();
        write_block(&mut text, "DELETE", &[current.clone()]);
        if !movie_terms.is_empty() {
            write_block(
                &mut text,
                "INSERT",
                &[TriplePattern::with_objects(SUBJECT, appears_in, movie_terms)],
            );
        }
        write_block(
            &mut text,
            "WHERE",
            &[
                GroupPattern::Triple(TriplePattern::new(
                    SUBJECT,
                    self.predicate(Predicate::Id),
                    Term::Integer(id),
                )),
                GroupPattern::Optional(current),
            ],
        );
        Ok(Some(MutationStatement::new(text)))
    }

    fn predicate(&self, predicate: Predicate) -> Term {
        Term::Iri(self.vocabulary.predicate(predicate))
    }

    fn resource(&self, local_name: &str) -> Result<Term, StatementError> {
        self.vocabulary.resource(local_name).map(Term::Iri)
    }

    fn movie_terms(&self, movies: &[String]) -> Result<Vec<Term>, StatementError> {
        movies.iter().map(|movie| self.resource(movie)).collect()
    }

    fn field_object(&self, field: CharacterField, value: &str) -> Result<Term, StatementError> {
        match field {
            CharacterField::Name => Ok(Term::literal(value)),
            CharacterField::Id => parse_id(value).map(Term::Integer),
            CharacterField::Kind | CharacterField::HomePlanet => self.resource(value),
        }
    }
}

/// Splits comma-separated movie text into local names.
///
/// All whitespace is removed from each entry ("A New Hope" becomes
/// "ANewHope") and empty entries are dropped.
pub fn split_movie_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|entry| entry.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Local name for a new character: whitespace stripped, lowercased.
pub fn subject_local_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Wraps a Turtle document in one `INSERT DATA` statement.
///
/// Prefix and base declarations are not allowed inside the data block, so
/// they are hoisted into the statement prologue.
pub fn bulk_insert(turtle: &str) -> MutationStatement {
    let mut prologue = String::new();
    let mut body = String::new();

    for line in turtle.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("@prefix") {
            prologue.push_str("PREFIX");
            prologue.push_str(directive_body(rest));
            prologue.push('\n');
        } else if let Some(rest) = trimmed.strip_prefix("@base") {
            prologue.push_str("BASE");
            prologue.push_str(directive_body(rest));
            prologue.push('\n');
        } else if starts_with_keyword(trimmed, "PREFIX") || starts_with_keyword(trimmed, "BASE") {
            prologue.push_str(directive_body(trimmed));
            prologue.push('\n');
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }

    MutationStatement::new(format!("{}INSERT DATA {{\n{}}}\n", prologue, body))
}

// Everything up to the closing `>` of the directive's IRI. Drops the Turtle
// `.` terminator and any trailing comment.
fn directive_body(rest: &str) -> &str {
    let rest = match rest.find('>') {
        Some(end) => &rest[..=end],
        None => rest,
    };
    rest.trim_end().trim_end_matches('.').trim_end()
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    match (line.get(..keyword.len()), line.get(keyword.len()..)) {
        (Some(head), Some(rest)) => {
            head.eq_ignore_ascii_case(keyword) && rest.starts_with(char::is_whitespace)
        }
        _ => false,
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, StatementError> {
    let value = value.trim();
    if value.is_empty() {
        Err(StatementError::MissingValue { field })
    } else {
        Ok(value)
    }
}

fn parse_id(value: &str) -> Result<i64, StatementError> {
    let value = required(value, "id")?;
    value
        .parse::<i64>()
        .map_err(|_| StatementError::InvalidIdentifier(value.to_string()))
}
