use async_trait::async_trait;

use crate::error::Result;
use crate::llm::call_openrouter;
use crate::scraper::{build_prompt, fetch_content};

use super::SummaryGenerator;

/// Summarizes pages through an OpenRouter chat model.
pub struct LlmSummarizer {
    api_key: String,
    model: String,
}

impl LlmSummarizer {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }
}

#[async_trait]
impl SummaryGenerator for LlmSummarizer {
    async fn generate(&self, url: &str) -> Result<String> {
        let content = fetch_content(url).await?;
        let prompt = build_prompt(&content.text());
        tracing::debug!(url, words = content.word_count(), prompt_len = prompt.len(), "calling LLM");

        let summary = call_openrouter(
            &self.api_key,
            &self.model,
            &prompt,
            Some(url),
            Some(env!("CARGO_PKG_NAME")),
        )
        .await?;

        Ok(ensure_markdown_formatting(&summary))
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Ensures the text starts with a Markdown heading.
fn ensure_markdown_formatting(text: &str) -> String {
    let text = text.trim();

    if !text.starts_with('#') {
        // Use the first line as the title unless it is too long
        let first_line = text.lines().next().unwrap_or("Website Summary");
        let title = if first_line.len() > 50 {
            "Website Summary"
        } else {
            first_line
        };

        return format!("# {}\n\n{}", title, text);
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_existing_heading() {
        assert_eq!(ensure_markdown_formatting("  # Title\n\nbody "), "# Title\n\nbody");
    }

    #[test]
    fn adds_heading_from_short_first_line() {
        assert_eq!(ensure_markdown_formatting("Overview\n- point"), "# Overview\n\nOverview\n- point");
    }

    #[test]
    fn long_first_line_gets_generic_heading() {
        let text = "a".repeat(60);
        assert_eq!(ensure_markdown_formatting(&text), format!("# Website Summary\n\n{}", text));
    }
}
