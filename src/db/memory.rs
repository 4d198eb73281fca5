use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::api::models::{SummaryPayload, SummaryRecord, SummaryUpdatePayload};
use crate::error::Result;

use super::SummaryRepository;

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, SummaryRecord>,
}

/// Process-local store. Ids are never reused, like SQLite `AUTOINCREMENT`.
#[derive(Default)]
pub struct InMemoryRepository {
    table: RwLock<Table>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SummaryRepository for InMemoryRepository {
    async fn post(&self, payload: &SummaryPayload) -> Result<i64> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            SummaryRecord {
                id,
                url: payload.url.to_string(),
                summary: None,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<SummaryRecord>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<SummaryRecord>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn put(&self, id: i64, payload: &SummaryUpdatePayload) -> Result<Option<SummaryRecord>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|record| {
            record.url = payload.url.to_string();
            record.summary = Some(payload.summary.clone());
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<i64>> {
        Ok(self.table.write().await.rows.remove(&id).map(|record| record.id))
    }

    async fn set_summary(&self, id: i64, summary: &str) -> Result<bool> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(record) if record.summary.is_none() => {
                record.summary = Some(summary.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
