//! In-memory fakes for the pipeline's collaborators. Each fake records what
//! it saw so scenario tests can assert on call counts and payloads.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use jobcast::discovery::{DiscoveryError, VideoSource};
use jobcast::entities::{CandidateVideo, NewListing};
use jobcast::extractor::{CompletionClient, CompletionError, ContentExtractor};
use jobcast::notifier::{DeliveryError, MessageSender, NotificationFanout};
use jobcast::pipeline::IngestPipeline;
use jobcast::repositories::{ListingStore, SubscriberStore};
use jobcast::transcript::{TranscriptError, TranscriptSource};

pub struct FakeVideoSource {
    pub videos: Mutex<Vec<CandidateVideo>>,
}

impl FakeVideoSource {
    pub fn new(videos: Vec<CandidateVideo>) -> Self {
        Self {
            videos: Mutex::new(videos),
        }
    }
}

#[async_trait]
impl VideoSource for FakeVideoSource {
    async fn latest(&self, page_size: u32) -> Result<Vec<CandidateVideo>, DiscoveryError> {
        let videos = self.videos.lock().unwrap();
        Ok(videos.iter().take(page_size as usize).cloned().collect())
    }
}

pub struct FakeTranscripts {
    pub by_video: Mutex<HashMap<String, String>>,
}

impl FakeTranscripts {
    pub fn new() -> Self {
        Self {
            by_video: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, video_id: &str, transcript: &str) {
        self.by_video
            .lock()
            .unwrap()
            .insert(video_id.to_string(), transcript.to_string());
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn fetch(&self, video_id: &str) -> Result<Option<String>, TranscriptError> {
        Ok(self.by_video.lock().unwrap().get(video_id).cloned())
    }
}

/// Scripted extraction service. The two prompt templates are told apart by
/// the section header only the details prompt carries.
pub struct ScriptedCompletion {
    pub link_reply: Mutex<String>,
    pub details_reply: Mutex<String>,
    pub calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new(link_reply: &str, details_reply: &str) -> Self {
        Self {
            link_reply: Mutex::new(link_reply.to_string()),
            details_reply: Mutex::new(details_reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("Transcript:") {
            Ok(self.details_reply.lock().unwrap().clone())
        } else {
            Ok(self.link_reply.lock().unwrap().clone())
        }
    }
}

/// Delivery fake: succeeds for everyone except the configured chat ids, and
/// records every successful send.
pub struct FlakySender {
    pub failing: Mutex<HashSet<i64>>,
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl FlakySender {
    pub fn new() -> Self {
        Self {
            failing: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    pub fn sent_messages(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for FlakySender {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        if self.failing.lock().unwrap().contains(&chat_id) {
            return Err(DeliveryError::Api("forbidden: bot was blocked".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id, text.to_string()));
        Ok(())
    }
}

pub struct InMemorySubscribers {
    pub rows: Mutex<BTreeMap<i64, bool>>,
}

impl InMemorySubscribers {
    pub fn new(subscribed: &[i64]) -> Self {
        Self {
            rows: Mutex::new(subscribed.iter().map(|&chat_id| (chat_id, true)).collect()),
        }
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscribers {
    async fn upsert(&self, chat_id: i64) -> anyhow::Result<i64> {
        self.rows.lock().unwrap().entry(chat_id).or_insert(true);
        Ok(chat_id)
    }

    async fn set_subscribed(&self, chat_id: i64, subscribed: bool) -> anyhow::Result<()> {
        self.rows.lock().unwrap().insert(chat_id, subscribed);
        Ok(())
    }

    async fn list_subscribed(&self) -> anyhow::Result<Vec<i64>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|&(_, &subscribed)| subscribed)
            .map(|(&chat_id, _)| chat_id)
            .collect())
    }
}

pub struct InMemoryListings {
    pub rows: Mutex<BTreeMap<String, (i64, NewListing)>>,
    next_id: AtomicI64,
    upsert_calls: AtomicUsize,
}

impl InMemoryListings {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            upsert_calls: AtomicUsize::new(0),
        }
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.rows.lock().unwrap().contains_key(video_id)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, video_id: &str) -> Option<NewListing> {
        self.rows
            .lock()
            .unwrap()
            .get(video_id)
            .map(|(_, listing)| listing.clone())
    }
}

#[async_trait]
impl ListingStore for InMemoryListings {
    async fn exists(&self, video_id: &str) -> anyhow::Result<bool> {
        Ok(self.contains(video_id))
    }

    async fn upsert(&self, listing: &NewListing) -> anyhow::Result<i64> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some((id, _)) = rows.get(&listing.video_id) {
            return Ok(*id);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        rows.insert(listing.video_id.clone(), (id, listing.clone()));
        Ok(id)
    }
}

/// Wires the fakes into a pipeline while keeping handles for assertions.
pub struct World {
    pub source: Arc<FakeVideoSource>,
    pub transcripts: Arc<FakeTranscripts>,
    pub llm: Arc<ScriptedCompletion>,
    pub sender: Arc<FlakySender>,
    pub subscribers: Arc<InMemorySubscribers>,
    pub listings: Arc<InMemoryListings>,
}

impl World {
    pub fn new(
        videos: Vec<CandidateVideo>,
        subscribed: &[i64],
        link_reply: &str,
        details_reply: &str,
    ) -> Self {
        Self {
            source: Arc::new(FakeVideoSource::new(videos)),
            transcripts: Arc::new(FakeTranscripts::new()),
            llm: Arc::new(ScriptedCompletion::new(link_reply, details_reply)),
            sender: Arc::new(FlakySender::new()),
            subscribers: Arc::new(InMemorySubscribers::new(subscribed)),
            listings: Arc::new(InMemoryListings::new()),
        }
    }

    pub fn pipeline(&self) -> IngestPipeline {
        IngestPipeline::new(
            self.source.clone(),
            self.transcripts.clone(),
            ContentExtractor::new(self.llm.clone()),
            NotificationFanout::new(self.sender.clone()),
            self.subscribers.clone(),
            self.listings.clone(),
            10,
            "hiring",
        )
    }
}

pub fn video(video_id: &str, title: &str, description: &str) -> CandidateVideo {
    CandidateVideo {
        video_id: video_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}
