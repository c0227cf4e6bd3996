//! HTTP plumbing shared by every source.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

use crate::config::Settings;
use crate::error::SourceError;

/// Build the client used for every upstream request in a run.
///
/// Every request carries a descriptive `User-Agent`, `Accept:
/// application/json`, and the configured timeout.
pub fn client(settings: &Settings) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .timeout(settings.timeout)
        .build()
}

/// GET `url` and parse the body as JSON.
///
/// Any non-2xx status is an error; there are no retries.
pub fn get_json(client: &Client, url: &str) -> Result<Value, SourceError> {
    tracing::debug!(url, "GET");
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes()?;
    Ok(serde_json::from_slice(&body)?)
}
