//! Wire types for the two Data API calls the source makes. Only the fields
//! the pipeline reads are modeled; everything else in the payload is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoResult>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResult {
    pub snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
