use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// `memory` for an in-process store, otherwise a SQLite URL.
    pub database_url: String,
    pub environment: String,
    pub testing: bool,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    /// Sentences kept by the extractive summarizer.
    pub summary_sentences: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
            database_url: "sqlite://summaries.db".to_string(),
            environment: "dev".to_string(),
            testing: false,
            openrouter_api_key: None,
            openrouter_model: DEFAULT_MODEL.to_string(),
            summary_sentences: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from `lookup`, which returns the raw value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        // Load server configuration with defaults
        let host = lookup("HOST").unwrap_or_else(|| defaults.server_addr.ip().to_string());
        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?,
            None => defaults.server_addr.port(),
        };
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let testing = match lookup("TESTING") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| AppError::ConfigError(format!("Invalid TESTING value: {}", value)))?,
            None => defaults.testing,
        };

        let summary_sentences = match lookup("SUMMARY_SENTENCES") {
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(AppError::ConfigError(format!("Invalid SUMMARY_SENTENCES: {}", value))),
            },
            None => defaults.summary_sentences,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            testing,
            openrouter_api_key: lookup("OPENROUTER_API_KEY").filter(|k| !k.trim().is_empty()),
            openrouter_model: lookup("OPENROUTER_MODEL").unwrap_or(defaults.openrouter_model),
            summary_sentences,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_boolean_flags() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" True "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn assert_config_error(pairs: &[(&str, &str)]) {
        match from_pairs(pairs) {
            Err(AppError::ConfigError(_)) => {}
            other => panic!("expected ConfigError for {pairs:?}, got {other:?}"),
        }
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.server_addr, Config::default().server_addr);
        assert_eq!(config.database_url, "sqlite://summaries.db");
        assert!(!config.testing);
    }

    #[test]
    fn reads_overrides() {
        let config = from_pairs(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("TESTING", "yes"),
            ("DATABASE_URL", "memory"),
            ("SUMMARY_SENTENCES", "3"),
            ("OPENROUTER_API_KEY", "  "),
        ])
        .unwrap();
        assert_eq!(config.server_addr.to_string(), "0.0.0.0:9000");
        assert!(config.testing);
        assert_eq!(config.database_url, "memory");
        assert_eq!(config.summary_sentences, 3);
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        assert_config_error(&[("PORT", "abc")]);
        assert_config_error(&[("PORT", "70000")]);
        assert_config_error(&[("HOST", "not-an-ip")]);
        assert_config_error(&[("TESTING", "maybe")]);
        assert_config_error(&[("SUMMARY_SENTENCES", "0")]);
        assert_config_error(&[("SUMMARY_SENTENCES", "many")]);
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.summary_sentences, 5);
        assert!(config.openrouter_api_key.is_none());
    }
}
