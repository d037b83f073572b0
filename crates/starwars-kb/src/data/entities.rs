//! Entity definitions for the character catalog

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::data::errors::StatementError;

/// Normalized, per-character view built from one or more result rows.
///
/// Every URI-valued field holds the local name only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: i64,
    pub name: String,
    pub kind: String,
    #[serde(rename = "homePlanet", default, skip_serializing_if = "Option::is_none")]
    pub home_planet: Option<String>,
    #[serde(default)]
    pub movies: Vec<String>,
}

impl EntityRecord {
    /// Text for a table cell, addressed by column selector.
    ///
    /// Returns `None` for unknown selectors. Movies are joined with `", "`,
    /// an absent home planet renders as an empty cell.
    pub fn cell_text(&self, selector: &str) -> Option<String> {
        let text = match selector {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "kind" => self.kind.clone(),
            "homePlanet" => self.home_planet.clone().unwrap_or_default(),
            "movie" | "movies" => self.movies.join(", "),
            _ => return None,
        };
        Some(text)
    }

    /// Current value of a single-valued field, as the edit surface shows it.
    pub fn field_value(&self, field: CharacterField) -> Option<String> {
        match field {
            CharacterField::Id => Some(self.id.to_string()),
            CharacterField::Name => Some(self.name.clone()),
            CharacterField::Kind => Some(self.kind.clone()),
            CharacterField::HomePlanet => self.home_planet.clone(),
        }
    }
}

/// A displayed table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub selector: &'static str,
}

/// Columns of the character table, in display order.
pub const COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec { label: "ID", selector: "id" },
    ColumnSpec { label: "Name", selector: "name" },
    ColumnSpec { label: "Home Planet", selector: "homePlanet" },
    ColumnSpec { label: "Kind", selector: "kind" },
    ColumnSpec { label: "Movies", selector: "movie" },
];

/// Single-valued character fields that can be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterField {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "kind")]
    Kind,
    #[serde(rename = "homePlanet")]
    HomePlanet,
}

impl CharacterField {
    pub fn selector(&self) -> &'static str {
        match self {
            CharacterField::Id => "id",
            CharacterField::Name => "name",
            CharacterField::Kind => "kind",
            CharacterField::HomePlanet => "homePlanet",
        }
    }

    /// Whether the field may be left without a value.
    pub fn is_optional(&self) -> bool {
        matches!(self, CharacterField::HomePlanet)
    }
}

impl fmt::Display for CharacterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for CharacterField {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(CharacterField::Id),
            "name" => Ok(CharacterField::Name),
            "kind" => Ok(CharacterField::Kind),
            "homePlanet" | "home_planet" | "home-planet" => Ok(CharacterField::HomePlanet),
            other => Err(StatementError::UnknownField(other.to_string())),
        }
    }
}

/// Flat input for creating a character, as typed into the add-row form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDraft {
    pub name: String,
    pub kind: String,
    pub id: String,
    #[serde(rename = "homePlanet", default)]
    pub home_planet: Option<String>,
    /// Comma-separated movie names.
    #[serde(rename = "movie", default)]
    pub movies: String,
}

impl CharacterDraft {
    /// Builds a draft from form fields keyed by column selector.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, StatementError> {
        let required = |key: &'static str| {
            fields
                .get(key)
                .cloned()
                .ok_or(StatementError::MissingValue { field: key })
        };

        Ok(Self {
            name: required("name")?,
            kind: required("kind")?,
            id: required("id")?,
            home_planet: fields.get("homePlanet").cloned(),
            movies: fields.get("movie").cloned().unwrap_or_default(),
        })
    }
}

/// A user edit, translated by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditIntent {
    Create(CharacterDraft),
    Delete {
        id: i64,
    },
    UpdateField {
        id: i64,
        field: CharacterField,
        old_value: Option<String>,
        new_value: String,
    },
    UpdateMovies {
        id: i64,
        old_movies: Vec<String>,
        new_movies: String,
    },
}

impl EditIntent {
    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            EditIntent::Create(_) => "create",
            EditIntent::Delete { .. } => "delete",
            EditIntent::UpdateField { .. } => "update_field",
            EditIntent::UpdateMovies { .. } => "update_movies",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn luke() -> EntityRecord {
        EntityRecord {
            id: 1,
            name: "Luke Skywalker".to_string(),
            kind: "Human".to_string(),
            home_planet: Some("Tatooine".to_string()),
            movies: vec!["ANewHope".to_string(), "TheEmpireStrikesBack".to_string()],
        }
    }

    #[test]
    fn test_cell_text() {
        let record = luke();
        assert_eq!(record.cell_text("id").as_deref(), Some("1"));
        assert_eq!(record.cell_text("movie").as_deref(), Some("ANewHope, TheEmpireStrikesBack"));
        assert_eq!(record.cell_text("homePlanet").as_deref(), Some("Tatooine"));
        assert_eq!(record.cell_text("nope"), None);

        let droid = EntityRecord { home_planet: None, ..luke() };
        assert_eq!(droid.cell_text("homePlanet").as_deref(), Some(""));
    }

    #[test]
    fn test_every_column_has_cell_text() {
        let record = luke();
        for column in COLUMNS {
            assert!(record.cell_text(column.selector).is_some(), "{}", column.label);
        }
    }

    #[test]
    fn test_record_serialization_omits_missing_home_planet() {
        let record = EntityRecord { home_planet: None, ..luke() };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("homePlanet").is_none());
        assert!(value.get("movie").is_none());

        let value = serde_json::to_value(luke()).unwrap();
        assert_eq!(value["homePlanet"], json!("Tatooine"));
    }

    #[test]
    fn test_character_field_parsing() {
        assert_eq!("homePlanet".parse::<CharacterField>().unwrap(), CharacterField::HomePlanet);
        assert_eq!("kind".parse::<CharacterField>().unwrap(), CharacterField::Kind);
        assert!(matches!(
            "movie".parse::<CharacterField>(),
            Err(StatementError::UnknownField(f)) if f == "movie"
        ));
    }

    #[test]
    fn test_draft_from_form() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), "Leia Organa".to_string());
        fields.insert("kind".to_string(), "Human".to_string());
        fields.insert("id".to_string(), "2".to_string());
        fields.insert("movie".to_string(), "A New Hope".to_string());

        let draft = CharacterDraft::from_form(&fields).unwrap();
        assert_eq!(draft.name, "Leia Organa");
        assert_eq!(draft.home_planet, None);
        assert_eq!(draft.movies, "A New Hope");

        fields.remove("kind");
        assert!(matches!(
            CharacterDraft::from_form(&fields),
            Err(StatementError::MissingValue { field: "kind" })
        ));
    }
}
