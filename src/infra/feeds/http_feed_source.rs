use crate::domain::ports::FeedSource;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("Failed to build feed HTTP client");
        Self { client }
    }
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let res = self.client.get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Calendar fetch failed for {}: {}", url, e)))?;

        if !res.status().is_success() {
            return Err(AppError::Upstream(format!("Calendar fetch for {} returned {}", url, res.status())));
        }

        res.text().await
            .map_err(|e| AppError::Upstream(format!("Calendar body read failed for {}: {}", url, e)))
    }
}
