//! Shared reqwest plumbing for the HTTP provider adapters.

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::domain::error::FinsightError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("finsight/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` and return the body, mapping transport and status failures.
pub async fn get_text(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
) -> Result<String, FinsightError> {
    let mut request = client.get(url).query(query);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    debug!("{provider} request: {url} with {} params", query.len());

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            FinsightError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            FinsightError::Provider {
                provider: provider.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FinsightError::Upstream {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FinsightError::Provider {
        provider: provider.to_string(),
        reason: format!("failed to read response: {e}"),
    })
}

/// Deserialize a provider payload, tagging parse failures with the provider.
pub fn parse_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, FinsightError> {
    serde_json::from_str(body).map_err(|e| FinsightError::Provider {
        provider: provider.to_string(),
        reason: format!("unexpected payload: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        value: i32,
    }

    #[test]
    fn parse_json_reads_payload() {
        let parsed: Payload = parse_json("TEST", r#"{"value": 7}"#).unwrap();
        assert_eq!(parsed.value, 7);
    }

    #[test]
    fn parse_json_tags_provider_on_error() {
        let err = parse_json::<Payload>("TEST", "not json").unwrap_err();
        assert!(matches!(err, FinsightError::Provider { ref provider, .. } if provider == "TEST"));
    }
}
