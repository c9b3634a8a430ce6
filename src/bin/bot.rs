use anyhow::Result;
use std::sync::Arc;

use jobcast::{
    bot::CommandBot, config::Config, notifier::TelegramClient, repositories::SubscriberRepository,
};

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

    let telegram = TelegramClient::new(config.bot_token());
    let subscribers = Arc::new(SubscriberRepository::new(pool));

    CommandBot::new(telegram, subscribers).run().await
}
