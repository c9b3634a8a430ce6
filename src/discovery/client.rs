use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{instrument, warn};

use crate::discovery::{
    DiscoveryError, VideoSource,
    types::{SearchListResponse, VideoListResponse},
};
use crate::entities::CandidateVideo;

const DATA_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 source.
///
/// Discovery is two calls: a `search.list` page of recent video ids for the
/// channel, then one `videos.list` per id. The search snippet truncates
/// descriptions, so the per-video call is what gives the full text the link
/// extraction needs.
pub struct YouTubeSource {
    http: Client,
    api_key: String,
    channel_id: String,
    base_url: String,
}

impl YouTubeSource {
    pub fn new(api_key: impl Into<String>, channel_id: impl Into<String>) -> Self {
        let http = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: api_key.into(),
            channel_id: channel_id.into(),
            base_url: DATA_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root. Used by tests to target a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[instrument(skip(self))]
    async fn search_page(&self, page_size: u32) -> Result<Vec<String>, DiscoveryError> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("channelId", self.channel_id.as_str()),
                ("maxResults", &page_size.to_string()),
                ("order", "date"),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Http { status });
        }

        let page: SearchListResponse = response.json().await?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    #[instrument(skip(self))]
    async fn video_detail(&self, video_id: &str) -> Result<Option<CandidateVideo>, DiscoveryError> {
        let response = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Http { status });
        }

        let detail: VideoListResponse = response.json().await?;
        Ok(detail.items.into_iter().next().map(|item| CandidateVideo {
            video_id: video_id.to_string(),
            title: item.snippet.title,
            description: item.snippet.description,
        }))
    }
}

#[async_trait]
impl VideoSource for YouTubeSource {
    async fn latest(&self, page_size: u32) -> Result<Vec<CandidateVideo>, DiscoveryError> {
        let mut videos = Vec::new();

        for video_id in self.search_page(page_size).await? {
            // A failed or empty detail lookup drops that one video, not the
            // whole page.
            match self.video_detail(&video_id).await {
                Ok(Some(video)) => videos.push(video),
                Ok(None) => {
                    warn!(%video_id, "video listed by search but missing from detail call")
                }
                Err(err) => warn!(%video_id, error = %err, "failed to fetch video detail"),
            }
        }

        Ok(videos)
    }
}
