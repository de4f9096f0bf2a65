//! Request client for the attendance service.
//!
//! # Design
//! `ApiClient` holds the target host/port and a `Transport`, and carries no
//! state between calls. `build_request` produces an `HttpRequest`, the
//! transport sends it, and the response is decoded into a
//! `ResponseEnvelope`. Authentication is never implicit: a `Session` has to
//! be passed to the call that should carry it.

use serde::Serialize;
use tracing::debug;

use crate::envelope::ResponseEnvelope;
use crate::error::ProbeError;
use crate::http::{HttpMethod, HttpRequest};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::Credentials;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const MONTHLY_SUMMARY_PATH: &str = "/api/attendance/monthly-summary";

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    host: String,
    port: u16,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(host: &str, port: u16, transport: T) -> Self {
        Self {
            host: host.to_string(),
            port,
            transport,
        }
    }

    /// Build the request descriptor for one call. Every request is sent as
    /// JSON; `data`, if given, becomes the body.
    pub fn build_request<D: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<&D>,
        session: Option<&Session>,
    ) -> Result<HttpRequest, ProbeError> {
        if !path.starts_with('/') {
            return Err(ProbeError::InvalidRequest(format!(
                "path must be absolute: {path:?}"
            )));
        }
        let body = data.map(serde_json::to_string).transpose()?;
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(session) = session {
            headers.extend(session.headers());
        }
        Ok(HttpRequest {
            method,
            host: self.host.clone(),
            port: self.port,
            path: path.to_string(),
            headers,
            body,
        })
    }

    /// Send a prepared request and decode the response.
    pub fn send(&self, request: &HttpRequest) -> Result<ResponseEnvelope, ProbeError> {
        let response = self.transport.execute(request)?;
        let envelope = ResponseEnvelope::from_response(response);
        debug!(
            method = %request.method,
            path = %request.path,
            status = envelope.status,
            "call finished"
        );
        Ok(envelope)
    }

    /// Build, send and decode one call.
    pub fn request<D: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<&D>,
    ) -> Result<ResponseEnvelope, ProbeError> {
        let request = self.build_request(method, path, data, None)?;
        self.send(&request)
    }

    pub fn login(&self, credentials: &Credentials) -> Result<ResponseEnvelope, ProbeError> {
        self.request(HttpMethod::Post, LOGIN_PATH, Some(credentials))
    }

    pub fn monthly_summary(
        &self,
        session: Option<&Session>,
    ) -> Result<ResponseEnvelope, ProbeError> {
        let request =
            self.build_request::<()>(HttpMethod::Get, MONTHLY_SUMMARY_PATH, None, session)?;
        self.send(&request)
    }
}
