//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate. `UreqTransport` builds a
//! fresh agent for every call, so each request owns its connection and nothing
//! is pooled between calls. Non-2xx statuses, redirects included, are
//! returned as data and never followed; only transport-level failures become
//! errors. Bodies are read in full with no size cap. There is no retry.

use std::time::Duration;

use tracing::debug;

use crate::error::ProbeError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Sends one request and reads the whole response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ProbeError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ProbeError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    timeout: Option<Duration>,
}

impl UreqTransport {
    /// `None` waits for the server indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn agent(&self) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(self.timeout)
            .build()
            .new_agent()
    }

    fn map_error(&self, err: ureq::Error) -> ProbeError {
        match err {
            ureq::Error::Timeout(_) => ProbeError::Timeout(self.timeout.unwrap_or_default()),
            other => ProbeError::from(other),
        }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ProbeError> {
        let agent = self.agent();
        let url = request.url();
        let headers = request.headers.as_slice();
        debug!(method = %request.method, %url, "sending request");

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(agent.get(&url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(agent.delete(&url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(&url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(agent.post(&url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(agent.put(&url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(agent.put(&url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(agent.patch(&url), headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(agent.patch(&url), headers).send_empty(),
        };
        let mut response = result.map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(key, value)| {
                (
                    key.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| self.map_error(e))?;
        debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
