use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("discovery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("discovery http error {status}")]
    Http { status: StatusCode },
}
