//! Outbound messaging: the Telegram Bot API client and the fanout that
//! broadcasts one message to every subscribed chat.

pub mod fanout;
pub mod telegram;

pub use fanout::{FanoutReport, NotificationFanout};
pub use telegram::{DeliveryError, MessageSender, TelegramClient};
