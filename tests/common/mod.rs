#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use url_summarizer::api::routes::create_router;
use url_summarizer::config::Config;
use url_summarizer::db::{SqliteRepository, SummaryRepository};
use url_summarizer::error::Result;
use url_summarizer::summarizer::SummaryGenerator;
use url_summarizer::AppState;

/// Generator that never touches the network.
pub struct StubSummarizer;

#[async_trait]
impl SummaryGenerator for StubSummarizer {
    async fn generate(&self, _url: &str) -> Result<String> {
        Ok("summary".to_string())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn with_repo(repo: Arc<dyn SummaryRepository>) -> Self {
        let config = Config {
            environment: "test".into(),
            testing: true,
            ..Config::default()
        };
        let state = AppState::new(config, repo, Arc::new(StubSummarizer));
        let router = create_router(state.clone());
        Self { state, router }
    }

    /// App backed by a fresh in-memory SQLite database.
    pub async fn with_db() -> Self {
        let repo = SqliteRepository::connect("sqlite::memory:")
            .await
            .expect("failed to open test database");
        Self::with_repo(Arc::new(repo))
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        self.request_with_headers(method, uri, &[], body).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Wait for every spawned summary task to finish.
    pub async fn settle(&self) {
        self.state.tasks.close();
        self.state.tasks.wait().await;
        self.state.tasks.reopen();
    }
}
