use reqwest::{Client, ClientBuilder};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{AppError, Result};

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body p").expect("Failed to parse paragraph selector")
});

// Used when a page has no <p> elements at all.
static FALLBACK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body li, body td, body blockquote, body pre, body h1, body h2, body h3")
        .expect("Failed to parse fallback selector")
});

/// Readable text pulled out of an HTML page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub title: Option<String>,
    pub paragraphs: Vec<String>,
}

impl PageContent {
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.split_whitespace().count()).sum()
    }
}

pub async fn fetch_html(url: &str) -> Result<String> {
    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::FetchError(format!("{} returned {}", url, status)));
    }
    let html = response.text().await?;
    Ok(html)
}

/// Fetch a page and extract its readable text.
pub async fn fetch_content(url: &str) -> Result<PageContent> {
    let html = fetch_html(url).await?;
    tracing::debug!(url, bytes = html.len(), "fetched page");
    extract_content(&html)
        .ok_or_else(|| AppError::ParseError(format!("No readable text found at {}", url)))
}

pub fn extract_content(html: &str) -> Option<PageContent> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let mut paragraphs = collect_text(&document, &PARAGRAPH_SELECTOR);
    if paragraphs.is_empty() {
        paragraphs = collect_text(&document, &FALLBACK_SELECTOR);
    }

    if paragraphs.is_empty() {
        return None;
    }
    Some(PageContent { title, paragraphs })
}

fn collect_text(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut result = String::new();
    for word in element.text().flat_map(str::split_whitespace) {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

pub fn build_prompt(content: &str) -> String {
    let mut result = String::with_capacity(content.len() + 150);
    result.push_str("The following is the content of a webpage. Please provide a concise summary formatted in Markdown. Use headers, bullet points, and other Markdown formatting to make the summary structured and readable:\n\n");
    result.push_str(content);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head><title> Example   Domain </title></head>
          <body>
            <h1>Heading</h1>
            <p>First   paragraph
               spans lines.</p>
            <div><p>Second <b>bold</b> paragraph.</p></div>
            <p>   </p>
          </body>
        </html>"#;

    #[test]
    fn extracts_title_and_paragraphs() {
        let content = extract_content(PAGE).unwrap();
        assert_eq!(content.title.as_deref(), Some("Example Domain"));
        assert_eq!(
            content.paragraphs,
            vec!["First paragraph spans lines.", "Second bold paragraph."]
        );
        assert_eq!(content.word_count(), 7);
    }

    #[test]
    fn falls_back_to_list_items() {
        let html = "<html><body><ul><li>One item</li><li>Two item</li></ul></body></html>";
        let content = extract_content(html).unwrap();
        assert_eq!(content.title, None);
        assert_eq!(content.text(), "One item\nTwo item");
    }

    #[test]
    fn empty_page_has_no_content() {
        assert!(extract_content("<html><body><div></div></body></html>").is_none());
    }
}
