//! Downloads a job posting and reduces it to compact text.
//!
//! No retries; every failure surfaces immediately.

use std::future::Future;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{redirect, Client};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

mod guard;
mod sanitize;

use guard::validate_job_url;
use sanitize::sanitize_html;
pub use sanitize::truncate_chars;

/// Default cap on downloaded bytes before sanitization.
pub const DEFAULT_MAX_BYTES: usize = 2_000_000;

const USER_AGENT: &str = "Mozilla/5.0 (CoverBot/1.0)";
/// Bounds connecting and each wait for response bytes, not the whole transfer.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("forbidden host '{0}'")]
    ForbiddenHost(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { status: u16, url: String },

    #[error("timed out waiting for {0}")]
    TimedOut(String),
}

/// Raw response body, capped at the requested byte budget.
#[derive(Debug)]
pub struct Download {
    pub body: Vec<u8>,
    /// `charset` parameter of the response `Content-Type`, if any.
    pub charset: Option<String>,
    pub truncated: bool,
}

/// HTTP fetcher for job postings. Cheap to clone; holds a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct JobFetcher {
    client: Client,
    read_timeout: Duration,
}

impl JobFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// `timeout` applies to the connect and to every read of the response,
    /// so a slow but steady page is not cut off.
    pub(crate) fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        // Redirect targets go through the same host guard as the original URL.
        let policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if let Err(e) = guard::check_host(attempt.url()) {
                attempt.error(e.to_string())
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .redirect(policy)
            .build()?;

        Ok(Self {
            client,
            read_timeout: timeout,
        })
    }

    /// Validates `raw_url`, downloads at most `max_bytes` of it and returns the
    /// sanitized visible text (at most 8000 characters, possibly empty).
    pub async fn fetch_job_text(&self, raw_url: &str, max_bytes: usize) -> Result<String, FetchError> {
        let url = match validate_job_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Rejected job URL: {e}");
                return Err(e);
            }
        };
        self.fetch_validated(url, max_bytes).await
    }

    /// Download + sanitize for a URL that already passed `validate_job_url`.
    pub(crate) async fn fetch_validated(&self, url: Url, max_bytes: usize) -> Result<String, FetchError> {
        let download = self.download(url.clone(), max_bytes).await?;
        let html = decode_body(&download.body, download.charset.as_deref());
        let text = sanitize_html(&html);

        info!(
            "Fetched job page {}: {} bytes downloaded, {} chars after sanitizing",
            url.host_str().unwrap_or_default(),
            download.body.len(),
            text.chars().count()
        );
        Ok(text)
    }

    /// Streams the response body, keeping at most `max_bytes`. Exceeding the
    /// budget truncates the body; it is not an error.
    pub(crate) async fn download(&self, url: Url, max_bytes: usize) -> Result<Download, FetchError> {
        let mut response = self
            .within_read_timeout(&url, self.client.get(url.clone()).send())
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let charset = charset_from_headers(response.headers());
        let mut body = Vec::new();
        let mut truncated = false;

        while let Some(chunk) = self.within_read_timeout(&url, response.chunk()).await? {
            let remaining = max_bytes - body.len();
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        if truncated {
            warn!("Job page {url} exceeded {max_bytes} bytes; body truncated");
        }

        Ok(Download {
            body,
            charset,
            truncated,
        })
    }

    async fn within_read_timeout<T>(
        &self,
        url: &Url,
        read: impl Future<Output = Result<T, reqwest::Error>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.read_timeout, read).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!("No data from {url} within {:?}", self.read_timeout);
                Err(FetchError::TimedOut(url.to_string()))
            }
        }
    }
}

fn charset_from_headers(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Decodes with the declared charset when it is a known label, else UTF-8.
/// Invalid sequences are replaced, never rejected.
fn decode_body(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
