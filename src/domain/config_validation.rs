//! Configuration validation.
//!
//! Checks every section before any provider or server is built from it.
//! Missing optional keys are fine; present keys must be well-formed.

use std::net::SocketAddr;

use crate::domain::currency::UnknownCurrencyPolicy;
use crate::domain::error::FinsightError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    validate_currency_config(config)?;
    validate_news_config(config)?;
    validate_dashboard_config(config)?;
    validate_url(config, "quotes", "base_url")?;
    validate_http_config(config)?;
    validate_web_config(config)?;
    Ok(())
}

pub fn validate_currency_config(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    validate_pivot(config)?;
    validate_unknown_code_policy(config)?;
    validate_url(config, "currency", "api_url")?;
    if let Some(path) = config.get_string("currency", "rates_file") {
        if path.trim().is_empty() {
            return Err(invalid("currency", "rates_file", "rates_file must not be empty"));
        }
    }
    Ok(())
}

pub fn validate_news_config(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    if let Some(category) = config.get_string("news", "category") {
        if category.trim().is_empty() {
            return Err(invalid("news", "category", "category must not be empty"));
        }
    }
    let limit = config.get_int("news", "limit", 5);
    if limit < 1 {
        return Err(invalid("news", "limit", "limit must be at least 1"));
    }
    validate_url(config, "news", "base_url")?;
    validate_url(config, "news", "feed_url")?;
    Ok(())
}

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    validate_symbol_list(config, "stocks")?;
    validate_symbol_list(config, "indices")?;
    if let Some(symbol) = config.get_string("dashboard", "chart_symbol") {
        if symbol.trim().is_empty() {
            return Err(invalid("dashboard", "chart_symbol", "chart_symbol must not be empty"));
        }
    }
    let days = config.get_int("dashboard", "chart_days", 30);
    if !(2..=365).contains(&days) {
        return Err(invalid("dashboard", "chart_days", "chart_days must be between 2 and 365"));
    }
    let headlines = config.get_int("dashboard", "headlines", 8);
    if headlines < 1 {
        return Err(invalid("dashboard", "headlines", "headlines must be at least 1"));
    }
    Ok(())
}

pub fn validate_http_config(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    let timeout = config.get_int("http", "timeout_secs", 10);
    if timeout < 1 {
        return Err(invalid("http", "timeout_secs", "timeout_secs must be at least 1"));
    }
    Ok(())
}

pub fn validate_web_config(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    if let Some(listen) = config.get_string("web", "listen") {
        if listen.trim().parse::<SocketAddr>().is_err() {
            return Err(invalid(
                "web",
                "listen",
                format!("'{}' is not a socket address (expected host:port)", listen.trim()),
            ));
        }
    }
    Ok(())
}

fn validate_pivot(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    match config.get_string("currency", "pivot") {
        None => Ok(()),
        Some(code) if is_currency_code(code.trim()) => Ok(()),
        Some(_) => Err(invalid("currency", "pivot", "pivot must be a three-letter currency code")),
    }
}

fn validate_unknown_code_policy(config: &dyn ConfigPort) -> Result<(), FinsightError> {
    match config.get_string("currency", "unknown_code") {
        None => Ok(()),
        Some(value) => value
            .parse::<UnknownCurrencyPolicy>()
            .map(|_| ())
            .map_err(|reason| invalid("currency", "unknown_code", reason)),
    }
}

fn validate_url(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FinsightError> {
    match config.get_string(section, key) {
        None => Ok(()),
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(()),
        Some(_) => Err(invalid(section, key, format!("{key} must be an http(s) URL"))),
    }
}

fn validate_symbol_list(config: &dyn ConfigPort, key: &str) -> Result<(), FinsightError> {
    if let Some(list) = config.get_string("dashboard", key) {
        if parse_symbols(&list).is_empty() {
            return Err(invalid("dashboard", key, format!("{key} must list at least one symbol")));
        }
    }
    Ok(())
}

/// Split a comma-separated symbol list, trimming and upper-casing entries.
pub fn parse_symbols(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FinsightError {
    FinsightError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
