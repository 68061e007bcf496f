use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Result;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SerperItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerperResp {
    #[serde(default)]
    organic: Vec<SerperItem>,
}

/// Search provider seam. The engine only needs "query in, ranked links
/// out", so tests inject fakes here.
#[async_trait::async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SerperItem>>;
}

pub struct Serper {
    http: Client,
    key: String,
    limiter: DefaultDirectRateLimiter,
    top_k: usize,
}

impl Serper {
    pub fn new(key: String, qps: u32, top_k: usize, timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        let qps = NonZeroU32::new(qps).unwrap_or(nonzero!(5u32));
        let limiter = RateLimiter::direct(Quota::per_second(qps));
        Ok(Serper {
            http,
            key,
            limiter,
            top_k,
        })
    }
}

#[async_trait::async_trait]
impl Searcher for Serper {
    async fn search(&self, query: &str) -> Result<Vec<SerperItem>> {
        self.limiter.until_ready().await;
        let resp = self
            .http
            .post("https://google.serper.dev/search")
            .header("X-API-KEY", &self.key)
            .json(&serde_json::json!({ "q": query, "num": self.top_k }))
            .send()
            .await?
            .error_for_status()?
            .json::<SerperResp>()
            .await?;
        Ok(resp.organic.into_iter().take(self.top_k).collect())
    }
}
