//! Page fetching with cache defeat and per-target fault isolation.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::sync::atomic::{AtomicI64, Ordering};
use url::Url;

use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::service::http::create_client;

/// Fetch primitive used by the orchestrator.
///
/// `None` is the "no data" outcome: the page could not be fetched and must be
/// dropped from the batch. Implementations never surface errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Hands out strictly increasing millisecond stamps, even for calls made
/// within the same millisecond.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicI64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    /// `url` with a fresh `param=<stamp>` query pair appended.
    pub fn bust(&self, url: &str, param: &str) -> Result<Url> {
        let mut url = Url::parse(url)?;
        url.query_pairs_mut()
            .append_pair(param, &self.next_stamp().to_string());
        Ok(url)
    }
}

/// Fetches server-rendered HTML over HTTP, one attempt per target.
pub struct HttpFetcher {
    client: Client,
    cache_bust_param: String,
    buster: CacheBuster,
}

impl HttpFetcher {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        Ok(Self::with_client(create_client(config)?, config))
    }

    pub fn with_client(client: Client, config: &AuditConfig) -> Self {
        Self {
            client,
            cache_bust_param: config.cache_bust_param.clone(),
            buster: CacheBuster::new(),
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let request_url = self.buster.bust(url, &self.cache_bust_param)?;
        tracing::trace!("[FETCH] GET {}", request_url);

        let response = self
            .client
            .get(request_url)
            .header(CACHE_CONTROL, "no-store, no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => {
                tracing::debug!("[FETCH] {} ({} bytes)", url, body.len());
                Some(body)
            }
            Err(e) => {
                tracing::warn!("[FETCH] Skipping {}: {}", url, e);
                None
            }
        }
    }
}
