//! Concurrent website reachability checks for surviving records.
//!
//! Every record handed to the validator gets exactly one
//! [`WebsiteCheck`] verdict. Probes run under a global concurrency cap
//! so a batch of thousands of listings never opens thousands of
//! simultaneous connections; each probe carries its own timeout, and a
//! failing or timing-out probe settles only its own record. There is no
//! retry — the pipeline wants a current reachability snapshot, not
//! guaranteed delivery.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;

use dmap_core::{ProbeStatus, Record, WebsiteCheck};

use crate::error::PipelineError;

/// Successful outcome of one existence probe: the response status and
/// the final URL after redirects.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub final_url: String,
}

/// Why a probe produced no HTTP response.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("redirect loop or limit exceeded")]
    Redirect,

    #[error("request failed: {0}")]
    Request(String),
}

impl ProbeError {
    /// The symbolic status recorded in the verdict for this failure.
    #[must_use]
    pub fn status(&self) -> ProbeStatus {
        match self {
            ProbeError::Timeout => ProbeStatus::Timeout,
            ProbeError::Connect => ProbeStatus::Error("connect".to_owned()),
            ProbeError::Redirect => ProbeStatus::Error("redirect".to_owned()),
            ProbeError::Request(_) => ProbeStatus::Error("request".to_owned()),
        }
    }
}

/// Transport seam for the validator.
///
/// Production uses [`HttpProbe`]; tests substitute instrumented fakes
/// to observe concurrency and inject failures.
pub trait UrlProbe {
    /// Issue one existence check against `url` (HEAD semantics: status
    /// and final URL, no body).
    fn probe(&self, url: &str) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send;
}

/// HTTP transport for reachability probes.
///
/// Issues `HEAD` requests, follows redirects, and never reads response
/// bodies. The client-level timeout backstops the validator's own
/// per-probe timeout.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Creates an `HttpProbe` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl UrlProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_connect() {
        ProbeError::Connect
    } else if err.is_redirect() {
        ProbeError::Redirect
    } else {
        ProbeError::Request(err.without_url().to_string())
    }
}

/// Cloneable handle for observing validation progress without blocking:
/// the number of probes that have settled so far.
#[derive(Debug, Clone)]
pub struct ValidationProgress(Arc<AtomicUsize>);

impl ValidationProgress {
    #[must_use]
    pub fn completed(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bounded-concurrency website validator over a [`UrlProbe`] transport.
pub struct WebsiteValidator<P> {
    probe: P,
    timeout: Duration,
    concurrency: usize,
    completed: Arc<AtomicUsize>,
}

impl<P: UrlProbe + Sync> WebsiteValidator<P> {
    /// `concurrency` is the maximum number of simultaneous in-flight
    /// probes, independent of batch size; values below 1 are clamped.
    #[must_use]
    pub fn new(probe: P, timeout: Duration, concurrency: usize) -> Self {
        Self {
            probe,
            timeout,
            concurrency: concurrency.max(1),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Progress handle counting settled probes across this validator's
    /// runs.
    #[must_use]
    pub fn progress(&self) -> ValidationProgress {
        ValidationProgress(Arc::clone(&self.completed))
    }

    /// Probe every record's website and attach a verdict, returning the
    /// records in their original order.
    ///
    /// Probes settle in arbitrary order under the concurrency cap; the
    /// fan-in step restores input order so downstream sorting stays
    /// deterministic. Every record receives exactly one verdict, and a
    /// single probe's timeout or failure never disturbs its siblings.
    pub async fn validate(&self, records: Vec<Record>) -> Vec<Record> {
        let mut checked: Vec<(usize, Record)> = stream::iter(records.into_iter().enumerate())
            .map(|(index, mut record)| async move {
                let check = self
                    .check_url(record.website.as_deref().unwrap_or(""))
                    .await;
                record.website_check = Some(check);
                self.completed.fetch_add(1, Ordering::Relaxed);
                (index, record)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        checked.sort_unstable_by_key(|(index, _)| *index);
        checked.into_iter().map(|(_, record)| record).collect()
    }

    async fn check_url(&self, raw: &str) -> WebsiteCheck {
        if raw.is_empty() {
            return WebsiteCheck {
                url: String::new(),
                status: ProbeStatus::NoUrl,
                reachable: false,
                final_url: None,
            };
        }

        let url = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_owned()
        } else {
            format!("https://{raw}")
        };

        match tokio::time::timeout(self.timeout, self.probe.probe(&url)).await {
            Ok(Ok(response)) => WebsiteCheck {
                reachable: response.status < 400,
                status: ProbeStatus::Code(response.status),
                final_url: Some(response.final_url),
                url,
            },
            Ok(Err(err)) => {
                tracing::debug!(url = %url, error = %err, "website probe failed");
                WebsiteCheck {
                    url,
                    status: err.status(),
                    reachable: false,
                    final_url: None,
                }
            }
            Err(_elapsed) => {
                tracing::debug!(url = %url, "website probe timed out");
                WebsiteCheck {
                    url,
                    status: ProbeStatus::Timeout,
                    reachable: false,
                    final_url: None,
                }
            }
        }
    }
}
