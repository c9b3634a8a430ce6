use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::entities::Subscriber;

/// Store operations the bot and the fanout need. The pipeline only ever
/// reads the subscribed set; the bot command surface does the writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Insert-if-absent keyed on the chat id, returning the row id either
    /// way. New rows start subscribed.
    async fn upsert(&self, chat_id: i64) -> Result<i64>;

    /// Flip the subscription flag, creating the row if needed.
    async fn set_subscribed(&self, chat_id: i64, subscribed: bool) -> Result<()>;

    /// Chat ids of everyone currently subscribed.
    async fn list_subscribed(&self) -> Result<Vec<i64>>;
}

#[derive(Clone)]
pub struct SubscriberRepository {
    pool: Pool<Postgres>,
}

impl SubscriberRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Subscriber>> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            "SELECT id, chat_id, subscribed, created_at FROM subscribers WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscriber)
    }
}

#[async_trait]
impl SubscriberStore for SubscriberRepository {
    async fn upsert(&self, chat_id: i64) -> Result<i64> {
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO subscribers (chat_id, subscribed)
            VALUES ($1, TRUE)
            ON CONFLICT (chat_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        // Row already existed; the unique index guarantees exactly one.
        match inserted {
            Some(id) => Ok(id),
            None => {
                let id =
                    sqlx::query_scalar::<_, i64>("SELECT id FROM subscribers WHERE chat_id = $1")
                        .bind(chat_id)
                        .fetch_one(&self.pool)
                        .await?;
                Ok(id)
            }
        }
    }

    async fn set_subscribed(&self, chat_id: i64, subscribed: bool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (chat_id, subscribed)
            VALUES ($1, $2)
            ON CONFLICT (chat_id) DO UPDATE SET subscribed = EXCLUDED.subscribed
            "#,
        )
        .bind(chat_id)
        .bind(subscribed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_subscribed(&self) -> Result<Vec<i64>> {
        let chat_ids = sqlx::query_scalar::<_, i64>(
            "SELECT chat_id FROM subscribers WHERE subscribed = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(chat_ids)
    }
}
