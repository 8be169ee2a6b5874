use std::time::Duration;

use chrono::Utc;

use crate::error::{PollError, Result};

/// Cache-busted retrieval of the feed's CSV export.
pub struct FeedTransport {
    client: reqwest::Client,
    url: String,
}

impl FeedTransport {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// GET the feed body as text. A throwaway `t` parameter keeps the
    /// spreadsheet host's intermediary caches from serving a stale export.
    pub async fn fetch_text(&self) -> Result<String> {
        let url = cache_busted(&self.url, Utc::now().timestamp_millis());

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Fetch(format!("feed returned HTTP {status}")));
        }

        Ok(response.text().await?)
    }
}

fn cache_busted(url: &str, millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={millis}")
}
