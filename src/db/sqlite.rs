use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::api::models::{SummaryPayload, SummaryRecord, SummaryUpdatePayload};
use crate::error::Result;

use super::schema::SCHEMA;
use super::SummaryRepository;

const SELECT_COLUMNS: &str = "SELECT id, url, summary, created_at FROM text_summary";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database and makes sure the table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to `:memory:` is its own database, so pin the
        // pool to one connection that never gets recycled.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::query(SCHEMA).execute(&pool).await?;
        tracing::info!(database_url, "database ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl SummaryRepository for SqliteRepository {
    async fn post(&self, payload: &SummaryPayload) -> Result<i64> {
        let result = sqlx::query("INSERT INTO text_summary (url, created_at) VALUES (?1, ?2)")
            .bind(payload.url.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<SummaryRecord>> {
        let record = sqlx::query_as::<_, SummaryRecord>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn get_all(&self) -> Result<Vec<SummaryRecord>> {
        let records = sqlx::query_as::<_, SummaryRecord>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn put(&self, id: i64, payload: &SummaryUpdatePayload) -> Result<Option<SummaryRecord>> {
        let result = sqlx::query("UPDATE text_summary SET url = ?1, summary = ?2 WHERE id = ?3")
            .bind(payload.url.as_str())
            .bind(&payload.summary)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<Option<i64>> {
        let result = sqlx::query("DELETE FROM text_summary WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok((result.rows_affected() > 0).then_some(id))
    }

    async fn set_summary(&self, id: i64, summary: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE text_summary SET summary = ?1 WHERE id = ?2 AND summary IS NULL")
            .bind(summary)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    async fn repo() -> SqliteRepository {
        SqliteRepository::connect("sqlite::memory:").await.unwrap()
    }

    fn payload(url: &str) -> SummaryPayload {
        SummaryPayload { url: Url::parse(url).unwrap() }
    }

    #[tokio::test]
    async fn post_then_get() {
        let repo = repo().await;
        let id = repo.post(&payload("https://foo.bar")).await.unwrap();
        assert!(id > 0);

        let record = repo.get(id).await.unwrap().unwrap();
        assert_eq!(record.url, "https://foo.bar/");
        assert_eq!(record.summary, None);
    }

    #[tokio::test]
    async fn get_all_is_ordered_by_id() {
        let repo = repo().await;
        let a = repo.post(&payload("https://a.example")).await.unwrap();
        let b = repo.post(&payload("https://b.example")).await.unwrap();

        let ids: Vec<i64> = repo.get_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn put_replaces_fields_and_keeps_created_at() {
        let repo = repo().await;
        let id = repo.post(&payload("https://foo.bar")).await.unwrap();
        let before = repo.get(id).await.unwrap().unwrap();

        let update = SummaryUpdatePayload {
            url: Url::parse("https://baz.qux/page").unwrap(),
            summary: "updated".into(),
        };
        let after = repo.put(id, &update).await.unwrap().unwrap();
        assert_eq!(after.url, "https://baz.qux/page");
        assert_eq!(after.summary.as_deref(), Some("updated"));
        assert_eq!(after.created_at, before.created_at);

        assert!(repo.put(id + 100, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_twice() {
        let repo = repo().await;
        let id = repo.post(&payload("https://foo.bar")).await.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), Some(id));
        assert_eq!(repo.delete(id).await.unwrap(), None);
        assert!(repo.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_summary_on_missing_row() {
        let repo = repo().await;
        assert!(!repo.set_summary(42, "text").await.unwrap());

        let id = repo.post(&payload("https://foo.bar")).await.unwrap();
        assert!(repo.set_summary(id, "text").await.unwrap());
        assert_eq!(repo.get(id).await.unwrap().unwrap().summary.as_deref(), Some("text"));
    }

    #[tokio::test]
    async fn set_summary_keeps_client_update() {
        let repo = repo().await;
        let id = repo.post(&payload("https://foo.bar")).await.unwrap();
        let update = SummaryUpdatePayload {
            url: Url::parse("https://foo.bar").unwrap(),
            summary: "from client".into(),
        };
        repo.put(id, &update).await.unwrap();

        assert!(!repo.set_summary(id, "generated").await.unwrap());
        assert_eq!(repo.get(id).await.unwrap().unwrap().summary.as_deref(), Some("from client"));
    }
}
