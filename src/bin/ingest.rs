use anyhow::Result;
use std::sync::Arc;

use jobcast::{
    config::Config,
    discovery::YouTubeSource,
    extractor::{ContentExtractor, OpenRouterClient},
    notifier::{NotificationFanout, TelegramClient},
    pipeline::IngestPipeline,
    repositories::{ListingRepository, SubscriberRepository},
    transcript::SupadataTranscripts,
};

/// One scheduled ingest pass. Invoked periodically by an external trigger
/// (cron or similar); the process exits when the pass completes.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(config.database_url())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let source = Arc::new(YouTubeSource::new(
        config.youtube_api_key(),
        config.channel_id(),
    ));
    let transcripts = Arc::new(SupadataTranscripts::new(config.transcript_api_key()));
    let extractor = ContentExtractor::new(Arc::new(OpenRouterClient::new(
        config.openrouter_api_key(),
        config.llm_model(),
    )));
    let fanout = NotificationFanout::new(Arc::new(TelegramClient::new(config.bot_token())));
    let subscribers = Arc::new(SubscriberRepository::new(pool.clone()));
    let listings = Arc::new(ListingRepository::new(pool));

    let pipeline = IngestPipeline::new(
        source,
        transcripts,
        extractor,
        fanout,
        subscribers,
        listings,
        config.page_size(),
        config.relevance_keyword(),
    );

    pipeline.run().await;
    Ok(())
}
