use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// --- Tables ---

#[derive(Debug, Clone, FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub chat_id: i64,
    pub subscribed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobListing {
    pub id: i64,
    pub video_id: String, // source-assigned, unique; the dedup key
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub role: String,
    pub location: String,
    pub apply_url: String,
    pub package_range: String,
    pub requirements: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a job listing; the id and timestamp are assigned by
/// the database.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub role: String,
    pub location: String,
    pub apply_url: String,
    pub package_range: String,
    pub requirements: String,
}

/// --- Ephemeral ---

/// A discovered video under consideration by one pipeline pass. Never
/// persisted; the transcript is fetched lazily, after the dedup check and
/// the relevance filter have both passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
}
