//! Page fetching.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::error::ScheduleError;
use crate::utils::fmt_duration;

/// Source of raw page HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the body of `url`. Timeouts, network errors and non-2xx
    /// statuses are all errors.
    async fn fetch(&self, url: &Url) -> Result<String, ScheduleError>;
}

/// Plain GET over HTTP(S) with a per-request timeout.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("schedule-reader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ScheduleError> {
        let start = Instant::now();
        let response = self.http.get(url.as_str()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "page request failed");
            ScheduleError::Fetch(Box::new(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScheduleError::Fetch(Box::new(e)))?;

        debug!(
            url = %url,
            bytes = body.len(),
            duration = fmt_duration(start.elapsed()),
            "page fetched"
        );
        Ok(body)
    }
}
