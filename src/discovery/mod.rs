//! Discovery of candidate videos from the channel being watched.
//!
//! The YouTube Data API is the only concrete source today; the pipeline
//! depends on the [`VideoSource`] trait so tests can feed it canned items.

pub mod client;
pub mod errors;
pub mod types;

pub use client::YouTubeSource;
pub use errors::DiscoveryError;

use async_trait::async_trait;

use crate::entities::CandidateVideo;

/// Produces the most recently published videos, newest first, bounded by
/// `page_size`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn latest(&self, page_size: u32) -> Result<Vec<CandidateVideo>, DiscoveryError>;
}
