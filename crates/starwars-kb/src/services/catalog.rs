use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    data::{
        CharacterField, CoreError, EditIntent, EntityRecord, MutationStatement, TraceContext,
    },
    services::{normalizer::normalize, statements::StatementBuilder},
    traits::QueryExecutor,
};

/// Load state of the character table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableDataAvailability {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub status: TableDataAvailability,
    pub records: Vec<EntityRecord>,
    /// Reason of the last failed read, if `status` is `Failed`.
    pub failure: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            status: TableDataAvailability::NotRequested,
            records: Vec::new(),
            failure: None,
            refreshed_at: None,
        }
    }
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The edit would not change stored data; nothing was sent.
    Unchanged,
    /// The store acknowledged the statement.
    Applied { statement: MutationStatement },
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied { .. })
    }
}

/// Service owning the character table: reads it from the graph store and
/// routes edits back as update statements.
pub struct CharacterCatalog {
    executor: Arc<dyn QueryExecutor>,
    database: String,
    builder: StatementBuilder,
    view: RwLock<CatalogView>,
}

impl CharacterCatalog {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        database: impl Into<String>,
        builder: StatementBuilder,
    ) -> Self {
        Self {
            executor,
            database: database.into(),
            builder,
            view: RwLock::new(CatalogView::default()),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Re-reads every character and replaces the view.
    ///
    /// On failure the view is marked `Failed` and its records are cleared.
    #[instrument(
        skip(self, trace_ctx),
        fields(trace_id = %trace_ctx.trace_id, parent_id = ?trace_ctx.parent_id, database = %self.database)
    )]
    pub async fn refresh(&self, trace_ctx: &TraceContext) -> Result<Vec<EntityRecord>, CoreError> {
        self.view.write().status = TableDataAvailability::Loading;

        let query = self.builder.vocabulary().select_characters_query();
        let result = match self.executor.select(trace_ctx, &self.database, &query).await {
            Ok(bindings) => normalize(&bindings).map_err(CoreError::from),
            Err(e) => Err(CoreError::store_with_context(
                "Character query failed",
                self.database.as_str(),
                Some(trace_ctx),
                e,
            )),
        };

        let mut view = self.view.write();
        match result {
            Ok(records) => {
                info!(count = records.len(), "Character table loaded");
                view.status = TableDataAvailability::Loaded;
                view.records = records.clone();
                view.failure = None;
                view.refreshed_at = Some(Utc::now());
                Ok(records)
            }
            Err(e) => {
                error!(error = %e, "Character table failed to load");
                view.status = TableDataAvailability::Failed;
                view.records.clear();
                view.failure = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Builds and submits the statement for an edit. Does not refresh.
    #[instrument(skip(self, trace_ctx, intent), fields(trace_id = %trace_ctx.trace_id, intent = intent.label()))]
    pub async fn apply(&self, trace_ctx: &TraceContext, intent: &EditIntent) -> Result<WriteOutcome, CoreError> {
        let statement = match self.builder.build(intent)? {
            Some(statement) => statement,
            None => {
                debug!("Edit leaves stored data unchanged, skipping write");
                return Ok(WriteOutcome::Unchanged);
            }
        };

        if let Err(e) = self.executor.update(trace_ctx, &self.database, &statement).await {
            error!(error = %e, "Character update failed");
            return Err(CoreError::store_with_context(
                "Character update failed",
                self.database.as_str(),
                Some(trace_ctx),
                e,
            ));
        }

        info!("Character update applied");
        Ok(WriteOutcome::Applied { statement })
    }

    /// Applies an edit and, only once the store acknowledged it, reloads the table.
    ///
    /// `Err` always means the write did not happen. A failed reload after an
    /// acknowledged write still returns `Applied`; the view is left `Failed`.
    pub async fn apply_and_refresh(
        &self,
        trace_ctx: &TraceContext,
        intent: &EditIntent,
    ) -> Result<WriteOutcome, CoreError> {
        let outcome = self.apply(trace_ctx, intent).await?;
        if outcome.is_applied() {
            if let Err(e) = self.refresh(&trace_ctx.new_child()).await {
                warn!(error = %e, "Update applied but the character table could not be reloaded");
            }
        }
        Ok(outcome)
    }

    pub fn snapshot(&self) -> CatalogView {
        self.view.read().clone()
    }

    pub fn status(&self) -> TableDataAvailability {
        self.view.read().status
    }

    pub fn find(&self, id: i64) -> Option<EntityRecord> {
        self.view.read().records.iter().find(|r| r.id == id).cloned()
    }

    /// Intent for an in-place cell edit, taking the old value from the view.
    ///
    /// Returns `None` when the character is not in the current view.
    pub fn field_edit(&self, id: i64, field: CharacterField, new_value: impl Into<String>) -> Option<EditIntent> {
        let Some(record) = self.find(id) else {
            warn!(id, field = %field, "Edit targets a character that is not loaded");
            return None;
        };
        Some(EditIntent::UpdateField {
            id,
            field,
            old_value: record.field_value(field),
            new_value: new_value.into(),
        })
    }

    /// Intent replacing the movie list of a loaded character.
    pub fn movies_edit(&self, id: i64, new_movies: impl Into<String>) -> Option<EditIntent> {
        let Some(record) = self.find(id) else {
            warn!(id, "Movie edit targets a character that is not loaded");
            return None;
        };
        Some(EditIntent::UpdateMovies {
            id,
            old_movies: record.movies,
            new_movies: new_movies.into(),
        })
    }
}
