pub mod listing;
pub mod subscriber;

pub use listing::{ListingRepository, ListingStore};
pub use subscriber::{SubscriberRepository, SubscriberStore};
