//! HTTP fetcher for downloading rule lists.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::{Config, RuleSource};
use crate::error::MergeError;

/// Anything that can produce the raw text body of a rule source.
#[async_trait]
pub trait BodySource: Send + Sync {
    /// Fetch the body of one source. Any error is a soft, per-source failure.
    async fn fetch(&self, source: &RuleSource) -> Result<String>;
}

/// HTTP client for fetching rule lists
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    /// Create a fetcher from the configured timeout, User-Agent and size limit
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

// Default is not implemented: new() can fail.

#[async_trait]
impl BodySource for Fetcher {
    /// Single attempt, no retry: a failed source is simply absent this run.
    async fn fetch(&self, source: &RuleSource) -> Result<String> {
        debug!("GET {}", source.url);

        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", source.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MergeError::Network(format!("HTTP {}", status)).into());
        }

        if let Some(content_length) = response.content_length() {
            check_size(content_length as usize, self.max_body_bytes)?;
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        check_size(bytes.len(), self.max_body_bytes)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn check_size(len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(MergeError::Network(format!(
            "Response too large: {} bytes (max: {} bytes)",
            len, max
        ))
        .into());
    }
    Ok(())
}
