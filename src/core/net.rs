// src/core/net.rs
// Blocking HTTP GET with a shared client and a small retry budget.

use std::{sync::OnceLock, thread, time::Duration};

use reqwest::blocking::Client;

use crate::config::consts::{HTTP_TIMEOUT_SECS, RETRIES, RETRY_BACKOFF_MS, USER_AGENT};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Server errors and transport failures are worth another attempt; 4xx is not.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Transport { .. } => true,
            FetchError::Client(_) => false,
        }
    }
}

static CLIENT: OnceLock<Client> = OnceLock::new();

fn client() -> Result<&'static Client, FetchError> {
    if let Some(c) = CLIENT.get() {
        return Ok(c);
    }
    let c = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(FetchError::Client)?;
    Ok(CLIENT.get_or_init(|| c))
}

fn get_once(url: &str) -> Result<String, FetchError> {
    let transport = |source| FetchError::Transport { url: url.to_string(), source };

    let resp = client()?.get(url).send().map_err(transport)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status { status: status.as_u16(), url: url.to_string() });
    }
    resp.text().map_err(transport)
}

/// GET `url` and return the body as text.
pub fn http_get(url: &str) -> Result<String, FetchError> {
    let mut attempt = 0u32;
    loop {
        match get_once(url) {
            Ok(body) => return Ok(body),
            Err(e) if attempt < RETRIES && e.is_retryable() => {
                attempt += 1;
                logd!("GET {url}: {e}; retry {attempt}/{RETRIES}");
                thread::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt)));
            }
            Err(e) => return Err(e),
        }
    }
}
