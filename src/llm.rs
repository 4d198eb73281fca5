use serde::Serialize;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{Result, AppError};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// Completions are slow, so this client gets a longer timeout than the page fetcher's
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build LLM HTTP client")
});

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

pub async fn call_openrouter(
    api_key: &str,
    model: &str,
    input_markdown: &str,
    site_url: Option<&str>,
    site_name: Option<&str>
) -> Result<String> {
    let body = ChatRequest {
        model: model.into(),
        messages: vec![
            Message {
                role: "user".into(),
                content: input_markdown.into(),
            }
        ],
    };

    let mut request = CLIENT
        .post(OPENROUTER_URL)
        .bearer_auth(api_key)
        .json(&body);

    // Add optional headers if provided
    if let Some(url) = site_url {
        request = request.header("HTTP-Referer", url);
    }

    if let Some(name) = site_name {
        request = request.header("X-Title", name);
    }

    let res = request
        .send()
        .await
        .map_err(|e| AppError::LlmError(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(AppError::LlmError(format!("OpenRouter returned {}: {}", status, text)));
    }

    let json: serde_json::Value = res
        .json()
        .await
        .map_err(|e| AppError::LlmError(e.to_string()))?;
    let reply = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))?
        .to_string();

    Ok(reply)
}
