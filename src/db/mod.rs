//! Storage for summary records.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::models::{SummaryPayload, SummaryRecord, SummaryUpdatePayload};
use crate::error::Result;

/// CRUD access to the `text_summary` table.
#[async_trait]
pub trait SummaryRepository: Send + Sync + 'static {
    /// Inserts a record with no summary yet and returns its id.
    async fn post(&self, payload: &SummaryPayload) -> Result<i64>;

    async fn get(&self, id: i64) -> Result<Option<SummaryRecord>>;

    /// All records, ordered by id.
    async fn get_all(&self) -> Result<Vec<SummaryRecord>>;

    /// Replaces url and summary. Returns `None` if the id does not exist.
    async fn put(&self, id: i64, payload: &SummaryUpdatePayload) -> Result<Option<SummaryRecord>>;

    /// Removes the record. Returns the deleted id, or `None` if it did not exist.
    async fn delete(&self, id: i64) -> Result<Option<i64>>;

    /// Stores generated summary text on a record that has none yet.
    /// Returns `false` if the record is gone or already has a summary.
    async fn set_summary(&self, id: i64, summary: &str) -> Result<bool>;
}

/// Opens the backend named by `database_url`: `memory` for an in-process
/// store, anything else is handed to SQLite.
pub async fn connect(database_url: &str) -> Result<Arc<dyn SummaryRepository>> {
    if database_url == "memory" {
        tracing::warn!("using in-memory store, records are lost on exit");
        return Ok(Arc::new(InMemoryRepository::new()));
    }
    Ok(Arc::new(SqliteRepository::connect(database_url).await?))
}
