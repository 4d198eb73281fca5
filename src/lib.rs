pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod scraper;
pub mod summarizer;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;
use config::Config;
use db::SummaryRepository;
use summarizer::SummaryGenerator;
use tokio_util::task::TaskTracker;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repo: Arc<dyn SummaryRepository>,
    pub generator: Arc<dyn SummaryGenerator>,
    /// Pending background summary tasks.
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(
        config: Config,
        repo: Arc<dyn SummaryRepository>,
        generator: Arc<dyn SummaryGenerator>,
    ) -> Self {
        AppState {
            config: Arc::new(config),
            repo,
            generator,
            tasks: TaskTracker::new(),
        }
    }
}
