//! The ingest pipeline: discovery → dedup-check → relevance filter →
//! extraction → notify → conditional persist.
//!
//! Items are processed strictly sequentially, one completing (through
//! persist-or-skip) before the next begins. Failures local to one item are
//! contained: the item is left uncommitted and will be re-attempted on the
//! next scheduled pass, because the dedup gate only recognizes committed
//! items. A listing is persisted only when the broadcast reached at least
//! one recipient.

pub mod format;

pub use format::broadcast_message;

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::discovery::VideoSource;
use crate::entities::{CandidateVideo, NewListing};
use crate::extractor::ContentExtractor;
use crate::notifier::NotificationFanout;
use crate::repositories::{ListingStore, SubscriberStore};
use crate::transcript::TranscriptSource;

/// Terminal state of one candidate item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Already committed by a previous pass.
    Skipped,
    /// Title lacked the relevance marker; no extraction was attempted.
    Filtered,
    /// Broadcast reached someone and the listing was committed.
    Stored { listing_id: i64 },
    /// Broadcast reached nobody; nothing was persisted.
    NotStored,
}

/// Per-pass tallies, one increment per discovered item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub skipped: usize,
    pub filtered: usize,
    pub stored: usize,
    pub not_stored: usize,
    pub errored: usize,
}

pub struct IngestPipeline {
    source: Arc<dyn VideoSource>,
    transcripts: Arc<dyn TranscriptSource>,
    extractor: ContentExtractor,
    fanout: NotificationFanout,
    subscribers: Arc<dyn SubscriberStore>,
    listings: Arc<dyn ListingStore>,
    page_size: u32,
    relevance_keyword: String,
}

impl IngestPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn VideoSource>,
        transcripts: Arc<dyn TranscriptSource>,
        extractor: ContentExtractor,
        fanout: NotificationFanout,
        subscribers: Arc<dyn SubscriberStore>,
        listings: Arc<dyn ListingStore>,
        page_size: u32,
        relevance_keyword: impl Into<String>,
    ) -> Self {
        Self {
            source,
            transcripts,
            extractor,
            fanout,
            subscribers,
            listings,
            page_size,
            relevance_keyword: relevance_keyword.into(),
        }
    }

    /// One full pass over the current discovery page.
    pub async fn run(&self) -> RunSummary {
        let videos = match self.source.latest(self.page_size).await {
            Ok(videos) => videos,
            Err(err) => {
                warn!(error = %err, "discovery failed; nothing to ingest this pass");
                return RunSummary::default();
            }
        };

        let mut summary = RunSummary {
            discovered: videos.len(),
            ..RunSummary::default()
        };

        for video in videos {
            let video_id = video.video_id.clone();
            match self.process_video(video).await {
                Ok(ItemOutcome::Skipped) => summary.skipped += 1,
                Ok(ItemOutcome::Filtered) => summary.filtered += 1,
                Ok(ItemOutcome::Stored { .. }) => summary.stored += 1,
                Ok(ItemOutcome::NotStored) => summary.not_stored += 1,
                Err(err) => {
                    warn!(%video_id, error = %err, "item failed; left uncommitted for the next pass");
                    summary.errored += 1;
                }
            }
        }

        info!(
            discovered = summary.discovered,
            stored = summary.stored,
            skipped = summary.skipped,
            filtered = summary.filtered,
            not_stored = summary.not_stored,
            errored = summary.errored,
            "ingest pass complete"
        );
        summary
    }

    #[instrument(skip(self, video), fields(video_id = %video.video_id))]
    async fn process_video(&self, video: CandidateVideo) -> anyhow::Result<ItemOutcome> {
        // Dedup before anything expensive.
        if self.listings.exists(&video.video_id).await? {
            info!("already stored, skipping");
            return Ok(ItemOutcome::Skipped);
        }

        if !is_relevant(&video.title, &self.relevance_keyword) {
            info!(title = %video.title, "title lacks relevance marker, filtered");
            return Ok(ItemOutcome::Filtered);
        }

        // A missing transcript is tolerated; extraction degrades to its
        // sentinel fields.
        let transcript = match self.transcripts.fetch(&video.video_id).await {
            Ok(transcript) => transcript.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "transcript fetch failed; extracting without it");
                String::new()
            }
        };

        let apply_url = self
            .extractor
            .application_link(&video.title, &video.description)
            .await;
        let details = self.extractor.job_details(&video.title, &transcript).await;

        let message = format::broadcast_message(&details, &apply_url);

        let recipients = self.subscribers.list_subscribed().await?;
        let report = self.fanout.notify(&recipients, &message).await;

        // Notify-before-persist: an item nobody received is not recorded,
        // so the next pass will retry it end to end.
        if !report.sent_to_anyone() {
            warn!("broadcast reached nobody; listing not stored");
            return Ok(ItemOutcome::NotStored);
        }

        let listing_id = self
            .listings
            .upsert(&NewListing {
                video_id: video.video_id,
                title: video.title,
                description: video.description,
                company_name: details.company_name,
                role: details.role,
                location: details.location,
                apply_url,
                package_range: details.package_range,
                requirements: details.requirements,
            })
            .await?;

        info!(listing_id, "listing stored");
        Ok(ItemOutcome::Stored { listing_id })
    }
}

fn is_relevant(title: &str, keyword: &str) -> bool {
    title.to_lowercase().contains(&keyword.to_lowercase())
}
