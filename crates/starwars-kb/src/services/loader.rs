use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    data::{CoreError, TraceContext},
    services::statements::bulk_insert,
    traits::{QueryExecutor, StoreAdmin},
};

/// Recreates a database from a Turtle document.
pub struct DatasetLoader {
    admin: Arc<dyn StoreAdmin>,
    executor: Arc<dyn QueryExecutor>,
}

impl DatasetLoader {
    pub fn new(admin: Arc<dyn StoreAdmin>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self { admin, executor }
    }

    /// Drops `database` if present, creates it empty and inserts `turtle`.
    #[instrument(skip(self, trace_ctx, turtle), fields(trace_id = %trace_ctx.trace_id, bytes = turtle.len()))]
    pub async fn load(&self, trace_ctx: &TraceContext, database: &str, turtle: &str) -> Result<(), CoreError> {
        info!("Creating database");

        // The database may not exist yet.
        if let Err(e) = self.admin.drop_database(trace_ctx, database).await {
            warn!(error = %e, "Drop before create failed, continuing");
        }

        self.admin
            .create_database(trace_ctx, database)
            .await
            .map_err(|e| CoreError::store_with_context("Database creation failed", database, Some(trace_ctx), e))?;

        let statement = bulk_insert(turtle);
        self.executor
            .update(trace_ctx, database, &statement)
            .await
            .map_err(|e| CoreError::store_with_context("Dataset insert failed", database, Some(trace_ctx), e))?;

        info!("Database created and populated");
        Ok(())
    }
}
