use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use url::Url;

/// A stored summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SummaryRecord {
    pub id: i64,
    pub url: String,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated body of `POST /summaries/`.
#[derive(Debug, Clone)]
pub struct SummaryPayload {
    pub url: Url,
}

/// Validated body of `PUT /summaries/{id}/`.
#[derive(Debug, Clone)]
pub struct SummaryUpdatePayload {
    pub url: Url,
    pub summary: String,
}

/// Short form returned by create and delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub id: i64,
    pub url: String,
}

#[derive(Serialize)]
pub struct PingResponse {
    pub ping: &'static str,
    pub environment: String,
    pub testing: bool,
}
