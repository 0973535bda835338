//! Error types for the weather client

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error: {0}")]
    Status(u16),

    /// API answered without usable data
    #[error("No {0} data")]
    NoData(&'static str),
}
