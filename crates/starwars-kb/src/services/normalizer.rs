//! Folds flat result rows into one record per character.
//!
//! The read query yields a row for every (character, movie) pair. Rows are
//! grouped by `id`, groups are ordered numerically, and each group is folded
//! left to right: scalar fields overwrite, `movie` values accumulate.

use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::data::{
    entities::EntityRecord,
    errors::NormalizeError,
    types::{Binding, BoundTerm},
};

/// Normalizes SELECT rows into entity records sorted by numeric id.
pub fn normalize(bindings: &[Binding]) -> Result<Vec<EntityRecord>, NormalizeError> {
    let mut groups: HashMap<&str, Vec<&Binding>> = HashMap::new();
    for binding in bindings {
        let id = binding
            .get("id")
            .ok_or(NormalizeError::MissingField { field: "id" })?;
        groups.entry(id.value.as_str()).or_default().push(binding);
    }

    let mut keyed = groups
        .into_iter()
        .map(|(key, rows)| Ok((parse_group_key(key)?, key, rows)))
        .collect::<Result<Vec<_>, NormalizeError>>()?;
    // HashMap order is arbitrary; ties ("1" vs "01") fall back to the raw key.
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let records = keyed
        .into_iter()
        .map(|(id, _, rows)| fold_group(id, &rows))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = bindings.len(), records = records.len(), "Normalized character rows");
    Ok(records)
}

fn parse_group_key(key: &str) -> Result<i64, NormalizeError> {
    key.trim()
        .parse::<i64>()
        .map_err(|_| NormalizeError::InvalidId { value: key.to_string() })
}

#[derive(Default)]
struct Accumulator {
    name: Option<String>,
    kind: Option<String>,
    home_planet: Option<String>,
    movies: Vec<String>,
}

fn fold_group(id: i64, rows: &[&Binding]) -> Result<EntityRecord, NormalizeError> {
    let mut acc = Accumulator::default();

    for binding in rows {
        for (variable, term) in binding.iter() {
            match variable.as_str() {
                "movie" => acc.movies.push(term.display_value().to_string()),
                "id" => {}
                "name" => merge(id, "name", &mut acc.name, term),
                "kind" => merge(id, "kind", &mut acc.kind, term),
                "homePlanet" => merge(id, "homePlanet", &mut acc.home_planet, term),
                other => trace!(id, variable = other, "Ignoring unexpected result variable"),
            }
        }
    }

    Ok(EntityRecord {
        id,
        name: acc.name.ok_or(NormalizeError::MissingField { field: "name" })?,
        kind: acc.kind.ok_or(NormalizeError::MissingField { field: "kind" })?,
        home_planet: acc.home_planet,
        movies: acc.movies,
    })
}

// Last row wins. Rows of one character should agree; a mismatch is tolerated.
fn merge(id: i64, field: &'static str, slot: &mut Option<String>, term: &BoundTerm) {
    let value = term.display_value();
    if let Some(previous) = slot.as_deref() {
        if previous != value {
            warn!(id, field, previous, current = value, "Rows for one character disagree, keeping the last value");
        }
    }
    *slot = Some(value.to_string());
}
