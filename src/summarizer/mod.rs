//! Background summary generation.
//!
//! A [`SummaryGenerator`] turns a URL into summary text. The create
//! handler hands each new record to [`generate_summary`], which runs on
//! its own task and writes the result back through the repository.

pub mod extractive;
pub mod llm;

pub use extractive::ExtractiveSummarizer;
pub use llm::LlmSummarizer;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::db::SummaryRepository;
use crate::error::Result;

/// Upper bound on fetching plus summarizing a single page.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

#[async_trait]
pub trait SummaryGenerator: Send + Sync + 'static {
    async fn generate(&self, url: &str) -> Result<String>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

/// Picks the LLM backend when an API key is configured, the extractive
/// one otherwise.
pub fn from_config(config: &Config) -> Arc<dyn SummaryGenerator> {
    match &config.openrouter_api_key {
        Some(key) => Arc::new(LlmSummarizer::new(key.clone(), config.openrouter_model.clone())),
        None => Arc::new(ExtractiveSummarizer::new(config.summary_sentences)),
    }
}

/// Generate a summary for record `id` and store it. Failures are logged
/// and leave the summary empty; nothing is retried. A summary set by the
/// client in the meantime is kept.
pub async fn generate_summary(
    repo: Arc<dyn SummaryRepository>,
    generator: Arc<dyn SummaryGenerator>,
    id: i64,
    url: String,
) {
    let start = std::time::Instant::now();
    tracing::info!(id, %url, generator = generator.name(), "generating summary");

    let summary = match tokio::time::timeout(GENERATION_TIMEOUT, generator.generate(&url)).await {
        Ok(Ok(summary)) if !summary.trim().is_empty() => summary,
        Ok(Ok(_)) => {
            tracing::warn!(id, %url, "summary generation produced no text");
            return;
        }
        Ok(Err(err)) => {
            tracing::warn!(id, %url, error = %err, "summary generation failed");
            return;
        }
        Err(_) => {
            tracing::warn!(id, %url, timeout = ?GENERATION_TIMEOUT, "summary generation timed out");
            return;
        }
    };

    match repo.set_summary(id, &summary).await {
        Ok(true) => tracing::info!(id, elapsed = ?start.elapsed(), "summary stored"),
        Ok(false) => tracing::info!(id, "record deleted or edited before summary was stored"),
        Err(err) => tracing::error!(id, error = %err, "failed to store summary"),
    }
}
