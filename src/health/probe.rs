//! Active health probing.
//!
//! # Responsibilities
//! - Issue one bounded HTTP GET against a target's health path
//! - Fold every failure mode into `Unhealthy`
//!
//! # Design Decisions
//! - Only a final `200 OK` within the timeout counts as healthy
//! - Redirects (301, 302, 303, 307, 308) are followed, at most ten, all
//!   inside the same deadline
//! - No retries inside a probe; the next cycle is the retry
//! - Failure causes are logged at debug only; the poll loop logs transitions

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::LOCATION, Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::time;
use url::Url;

use crate::config::ProbeConfig;
use crate::health::state::HealthStatus;
use crate::monitor::Target;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Why a probe did not end in a final status.
#[derive(Debug, Error)]
enum ProbeError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("connection error: {0}")]
    Connection(#[from] hyper_util::client::legacy::Error),

    #[error("redirect without a usable Location header")]
    BadRedirect,

    #[error("more than {0} redirects")]
    TooManyRedirects(usize),
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// A single health check against a target.
///
/// Implementations never fail: anything other than a clear success is
/// reported as [`HealthStatus::Unhealthy`].
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, target: &Target) -> HealthStatus;
}

/// HTTP GET probe against `http://host:port<path>`, following redirects.
pub struct HttpProbe {
    client: Client<HttpConnector, Body>,
    path: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeout_secs)));

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(connector);

        Self {
            client,
            path: config.path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Override the overall probe deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// GET `url`, following redirects, and return the final status.
    async fn final_status(&self, mut url: Url) -> Result<StatusCode, ProbeError> {
        for _ in 0..=MAX_REDIRECTS {
            let request = Request::builder()
                .method("GET")
                .uri(url.as_str())
                .header("user-agent", self.user_agent.as_str())
                .body(Body::empty())?;

            let response = self.client.request(request).await?;
            let status = response.status();
            if !is_followed_redirect(status) {
                return Ok(status);
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or(ProbeError::BadRedirect)?;
            url = url.join(location).map_err(|_| ProbeError::BadRedirect)?;
        }

        Err(ProbeError::TooManyRedirects(MAX_REDIRECTS))
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self, target: &Target) -> HealthStatus {
        let url = match Url::parse(&target.url(&self.path)) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(target_id = %target.id(), error = %ProbeError::from(e), "Probe failed");
                return HealthStatus::Unhealthy;
            }
        };

        let healthy = match time::timeout(self.timeout, self.final_status(url)).await {
            Ok(Ok(status)) => {
                let success = status == StatusCode::OK;
                if !success {
                    tracing::debug!(target_id = %target.id(), status = %status, "Probe failed: status is not 200");
                }
                success
            }
            Ok(Err(e)) => {
                tracing::debug!(target_id = %target.id(), error = %e, "Probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(target_id = %target.id(), timeout_ms = self.timeout.as_millis() as u64, "Probe failed: timeout");
                false
            }
        };

        HealthStatus::from(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_only_standard_redirects() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_followed_redirect(StatusCode::from_u16(code).unwrap()));
        }
        for code in [200, 204, 300, 304, 404] {
            assert!(!is_followed_redirect(StatusCode::from_u16(code).unwrap()));
        }
    }
}
