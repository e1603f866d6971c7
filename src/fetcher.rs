//! Resilient HTTP fetch layer
//!
//! Every network call the crawler makes goes through [`ResilientFetcher`]: a
//! single shared transport session, a bounded retry loop with linear backoff,
//! and a semaphore capping how many requests are in flight at once across all
//! concurrent walker tasks.
//!
//! Upstream failures are absorbed here. A request that still fails after the
//! full retry budget yields `Ok(None)` — callers treat that as "no data for
//! this subtree", never as a fatal error. The only hard error is calling
//! [`ResilientFetcher::fetch`] before [`ResilientFetcher::connect`], which is
//! a lifecycle bug rather than an upstream condition.

use crate::config::{Config, RetryConfig};
use crate::error::{Error, Result};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// HTTP fetcher with bounded retries and a shared, reusable transport session.
///
/// The session is opened once with [`connect`](Self::connect) before a
/// traversal begins and closed once with [`disconnect`](Self::disconnect)
/// after the traversal (and all tasks it spawned) fully complete. `fetch`
/// takes `&self`, so any number of concurrent tasks can share one fetcher.
pub struct ResilientFetcher {
    client: Option<reqwest::Client>,
    retry: RetryConfig,
    in_flight: Arc<Semaphore>,
}

impl ResilientFetcher {
    /// Create a fetcher in the disconnected state.
    pub fn new(config: &Config) -> Self {
        Self {
            client: None,
            retry: config.retry.clone(),
            in_flight: Arc::new(Semaphore::new(config.http.max_concurrent_fetches)),
        }
    }

    /// Open the shared transport session.
    pub fn connect(&mut self) -> Result<()> {
        let client = reqwest::Client::builder().build()?;
        self.client = Some(client);
        Ok(())
    }

    /// Close the shared transport session. Idle connections are dropped;
    /// subsequent `fetch` calls fail with [`Error::TransportNotConnected`].
    pub fn disconnect(&mut self) {
        self.client = None;
    }

    /// Whether the transport session is currently open.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Issue a GET request, retrying on any failure.
    ///
    /// A response counts as success only for HTTP 200 or 203 with a body that
    /// parses as JSON (the upstream sometimes mislabels the content-type, so
    /// the declared type is ignored). Anything else — other statuses,
    /// transport errors, unparseable bodies — is a failed attempt: it is
    /// logged at warn level and followed by a `backoff_base × attempt` sleep,
    /// except after the final attempt.
    ///
    /// Returns `Ok(None)` once the retry budget is exhausted. Callers must
    /// treat that as "no data", not as an error.
    ///
    /// # Errors
    ///
    /// [`Error::TransportNotConnected`] if `connect` was never called (or
    /// `disconnect` already ran) — the one lifecycle-misuse condition that
    /// aborts instead of degrading.
    pub async fn fetch(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Option<serde_json::Value>> {
        let client = self.client.as_ref().ok_or(Error::TransportNotConnected)?;

        for attempt in 1..=self.retry.max_attempts {
            tracing::debug!(%url, attempt, "requesting");

            match self.attempt(client, url, query).await {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => {
                    tracing::warn!(
                        %url,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        %reason,
                        "upstream request failed"
                    );
                }
            }

            // No wait after the final attempt
            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.backoff_base * attempt).await;
            }
        }

        tracing::error!(
            %url,
            attempts = self.retry.max_attempts,
            "retry budget exhausted, treating as no data"
        );
        Ok(None)
    }

    /// One attempt: send the request while holding an in-flight permit and
    /// classify the outcome. The permit is released before any backoff sleep
    /// so a waiting retry never blocks other tasks' requests.
    async fn attempt(
        &self,
        client: &reqwest::Client,
        url: &str,
        query: &[(String, String)],
    ) -> std::result::Result<serde_json::Value, String> {
        let _permit = self
            .in_flight
            .acquire()
            .await
            .map_err(|_| "in-flight limiter closed".to_string())?;

        let response = client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("transport error: {e}"))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::NON_AUTHORITATIVE_INFORMATION {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("status {status}: {body}"));
        }

        // Parse the body ourselves instead of Response::json so a mislabeled
        // content-type cannot get in the way.
        let body = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;
        serde_json::from_slice(&body).map_err(|e| format!("body is not valid JSON: {e}"))
    }
}
