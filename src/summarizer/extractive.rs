//! Keyword-frequency sentence extraction.
//!
//! Each sentence is scored on three signals: how many of the page's
//! frequent keywords it contains, how much it overlaps with the page
//! title, and how early it appears. The best sentences are returned in
//! their original order.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::scraper::fetch_content;

use super::SummaryGenerator;

const KEYWORD_COUNT: usize = 10;
const MIN_SENTENCE_WORDS: usize = 4;

const KEYWORD_WEIGHT: f64 = 0.6;
const TITLE_WEIGHT: f64 = 0.25;
const POSITION_WEIGHT: f64 = 0.15;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "said", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Summarizes a page by picking its highest-scoring sentences.
pub struct ExtractiveSummarizer {
    sentences: usize,
}

impl ExtractiveSummarizer {
    pub fn new(sentences: usize) -> Self {
        Self { sentences: sentences.max(1) }
    }
}

#[async_trait]
impl SummaryGenerator for ExtractiveSummarizer {
    async fn generate(&self, url: &str) -> Result<String> {
        let content = fetch_content(url).await?;
        let summary = summarize(content.title.as_deref(), &content.text(), self.sentences);
        if summary.is_empty() {
            return Err(AppError::ParseError(format!("No summarizable sentences at {}", url)));
        }
        Ok(summary)
    }

    fn name(&self) -> &'static str {
        "extractive"
    }
}

/// Return at most `max_sentences` sentences of `text`, in document order.
/// Empty when no sentence is long enough to keep.
pub fn summarize(title: Option<&str>, text: &str, max_sentences: usize) -> String {
    let sentences: Vec<&str> = split_sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= MIN_SENTENCE_WORDS)
        .collect();

    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let keywords = keywords(text);
    let title_words: HashSet<String> = title.map(tokenize).unwrap_or_default().into_iter().collect();
    let total = sentences.len() as f64;

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let words = tokenize(sentence);
            let keyword_score = keyword_density(&words, &keywords);
            let title_score = title_overlap(&words, &title_words);
            let position_score = 1.0 - i as f64 / total;
            let score = KEYWORD_WEIGHT * keyword_score
                + TITLE_WEIGHT * title_score
                + POSITION_WEIGHT * position_score;
            (i, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut chosen: Vec<usize> = scored.into_iter().take(max_sentences).map(|(i, _)| i).collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|i| sentences[i])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on `.`, `!` or `?` followed by whitespace. Line breaks also end a
/// sentence since they separate paragraphs.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    for line in text.lines() {
        let mut start = 0;
        let mut chars = line.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let at_boundary = matches!(c, '.' | '!' | '?')
                && chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                push_trimmed(&mut sentences, &line[start..end]);
                start = end;
            }
        }
        push_trimmed(&mut sentences, &line[start..]);
    }
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// The most frequent non-stopwords, weighted relative to the top one.
fn keywords(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in tokenize(text) {
        *counts.entry(word).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(KEYWORD_COUNT);

    let top = ranked.first().map_or(1, |(_, n)| *n) as f64;
    ranked.into_iter().map(|(w, n)| (w, n as f64 / top)).collect()
}

fn keyword_density(words: &[String], keywords: &HashMap<String, f64>) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let hits: f64 = words.iter().filter_map(|w| keywords.get(w)).sum();
    hits / words.len() as f64
}

fn title_overlap(words: &[String], title_words: &HashSet<String>) -> f64 {
    if title_words.is_empty() {
        return 0.0;
    }
    let shared = words.iter().filter(|w| title_words.contains(*w)).collect::<HashSet<_>>().len();
    shared as f64 / title_words.len() as f64
}
