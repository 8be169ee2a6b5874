//! Error taxonomy for the feed pipeline.

/// Result type alias
pub type Result<T> = std::result::Result<T, PollError>;

/// What can go wrong on one poll tick. None of these are fatal to the
/// process; the poller logs them and keeps the previous snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Network or HTTP-level failure retrieving the feed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The feed body could not be parsed as delimited text.
    #[error("feed parse failed: {0}")]
    Parse(String),

    /// Feed reachable and parseable, but no row passed the validity check.
    #[error("feed contains no valid rows")]
    NoValidRecord,
}

impl From<reqwest::Error> for PollError {
    fn from(err: reqwest::Error) -> Self {
        PollError::Fetch(err.to_string())
    }
}

impl From<csv::Error> for PollError {
    fn from(err: csv::Error) -> Self {
        PollError::Parse(err.to_string())
    }
}
