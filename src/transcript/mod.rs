//! Transcript lookup for discovered videos.
//!
//! A transcript is best-effort input to extraction: videos without captions
//! or with a still-processing transcript yield `None`, and the extractor is
//! expected to fall back to its sentinel fields rather than fail.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

const TRANSCRIPT_API_BASE: &str = "https://api.supadata.ai/v1";

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("transcript request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcript http error {status}")]
    Http { status: StatusCode },
}

/// `Ok(None)` means "no transcript available", which the pipeline treats the
/// same as an empty one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Option<String>, TranscriptError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    content: Option<String>,
    #[serde(rename = "jobId")]
    job_id: Option<String>,
}

/// Supadata transcript API client.
pub struct SupadataTranscripts {
    http: Client,
    api_key: String,
    base_url: String,
}

impl SupadataTranscripts {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: api_key.into(),
            base_url: TRANSCRIPT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root. Used by tests to target a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TranscriptSource for SupadataTranscripts {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Option<String>, TranscriptError> {
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");

        let response = self
            .http
            .get(format!("{}/youtube/transcript", self.base_url))
            .header("x-api-key", &self.api_key)
            .query(&[
                ("url", watch_url.as_str()),
                ("lang", "en"),
                ("text", "true"),
                ("mode", "auto"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(TranscriptError::Http { status });
        }

        let body: TranscriptResponse = response.json().await?;

        // Large videos come back as an async job instead of inline content;
        // this pass does not wait for it.
        if let Some(job_id) = body.job_id
            && body.content.is_none()
        {
            debug!(video_id, %job_id, "transcript still processing");
            return Ok(None);
        }

        Ok(body.content.filter(|content| !content.trim().is_empty()))
    }
}
