//! Telegram command surface: `/start`, `/subscribe`, `/unsubscribe`.
//!
//! A first contact creates the subscriber row idempotently and starts
//! subscribed; the other two commands just flip the flag. Rows are never
//! deleted. The loop long-polls `getUpdates` until ctrl-c.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::notifier::telegram::{MessageSender, TelegramClient, TelegramUpdate};
use crate::repositories::SubscriberStore;

pub const WELCOME_TEXT: &str = "👋 Welcome to Jobcast! You will receive new tech job listings here. To unsubscribe, use /unsubscribe.";
pub const SUBSCRIBED_TEXT: &str = "✅ You are subscribed to job listings!";
pub const UNSUBSCRIBED_TEXT: &str = "❌ You have unsubscribed from job listings.";

const POLL_TIMEOUT_SECS: u64 = 30;
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Handle one command message. Failures are reported to the caller but mean
/// nothing for other chats.
#[instrument(skip(subscribers, sender, text), fields(command = %first_token(text)))]
pub async fn handle_command(
    subscribers: &dyn SubscriberStore,
    sender: &dyn MessageSender,
    chat_id: i64,
    text: &str,
) -> anyhow::Result<()> {
    match first_token(text) {
        "/start" => {
            subscribers.upsert(chat_id).await?;
            sender.send(chat_id, WELCOME_TEXT).await?;
        }
        "/subscribe" => {
            subscribers.set_subscribed(chat_id, true).await?;
            sender.send(chat_id, SUBSCRIBED_TEXT).await?;
        }
        "/unsubscribe" => {
            subscribers.set_subscribed(chat_id, false).await?;
            sender.send(chat_id, UNSUBSCRIBED_TEXT).await?;
        }
        // Anything else is ordinary chatter; stay quiet.
        _ => {}
    }
    Ok(())
}

/// `/subscribe@SomeBot args` -> `/subscribe`
fn first_token(text: &str) -> &str {
    let token = text.split_whitespace().next().unwrap_or("");
    token.split('@').next().unwrap_or(token)
}

pub struct CommandBot {
    telegram: TelegramClient,
    subscribers: Arc<dyn SubscriberStore>,
}

impl CommandBot {
    pub fn new(telegram: TelegramClient, subscribers: Arc<dyn SubscriberStore>) -> Self {
        Self {
            telegram,
            subscribers,
        }
    }

    /// Long-poll update loop. Returns after a shutdown signal.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut offset: Option<i64> = None;
        info!("command bot started");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("received shutdown signal, stopping command bot");
                    return Ok(());
                }
                updates = self.telegram.get_updates(offset, POLL_TIMEOUT_SECS) => {
                    match updates {
                        Ok(updates) => {
                            for update in updates {
                                offset = Some(update.update_id + 1);
                                self.handle_update(update).await;
                            }
                        }
                        Err(err) => {
                            error!(error = %err, "failed to fetch updates");
                            // Brief pause on error to avoid a tight loop.
                            sleep(ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }
    }

    async fn handle_update(&self, update: TelegramUpdate) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };

        let chat_id = message.chat.id;
        if let Err(err) =
            handle_command(self.subscribers.as_ref(), &self.telegram, chat_id, &text).await
        {
            warn!(chat_id, error = %err, "command handling failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::telegram::MockMessageSender;
    use crate::repositories::subscriber::MockSubscriberStore;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn start_registers_and_welcomes() {
        let mut subscribers = MockSubscriberStore::new();
        subscribers
            .expect_upsert()
            .with(eq(42))
            .times(1)
            .returning(|_| Ok(7));
        let mut sender = MockMessageSender::new();
        sender
            .expect_send()
            .withf(|chat_id, text| *chat_id == 42 && text == WELCOME_TEXT)
            .times(1)
            .returning(|_, _| Ok(()));

        handle_command(&subscribers, &sender, 42, "/start")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscribe_and_unsubscribe_flip_the_flag() {
        for (command, flag, reply) in [
            ("/subscribe", true, SUBSCRIBED_TEXT),
            ("/unsubscribe", false, UNSUBSCRIBED_TEXT),
        ] {
            let mut subscribers = MockSubscriberStore::new();
            subscribers
                .expect_set_subscribed()
                .with(eq(42), eq(flag))
                .times(1)
                .returning(|_, _| Ok(()));
            let mut sender = MockMessageSender::new();
            sender
                .expect_send()
                .withf(move |chat_id, text| *chat_id == 42 && text == reply)
                .times(1)
                .returning(|_, _| Ok(()));

            handle_command(&subscribers, &sender, 42, command)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn bot_suffix_and_arguments_are_tolerated() {
        let mut subscribers = MockSubscriberStore::new();
        subscribers
            .expect_set_subscribed()
            .with(eq(42), eq(true))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut sender = MockMessageSender::new();
        sender.expect_send().times(1).returning(|_, _| Ok(()));

        handle_command(&subscribers, &sender, 42, "/subscribe@JobcastBot now")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn plain_chatter_is_ignored() {
        let subscribers = MockSubscriberStore::new();
        let sender = MockMessageSender::new();

        handle_command(&subscribers, &sender, 42, "hello there")
            .await
            .unwrap();
    }
}
