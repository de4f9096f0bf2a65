//! Decoded view of a response.
//!
//! # Design
//! The body is decoded best-effort: valid JSON becomes `Body::Json`, anything
//! else is kept verbatim as `Body::Raw`. Callers can always tell which case
//! they got, and a decode failure never fails the call.

use std::fmt;

use serde_json::Value;

use crate::http::HttpResponse;

/// Response body after the best-effort JSON decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Raw(String),
}

impl Body {
    /// Decode `bytes` as JSON, falling back to the raw text.
    pub fn decode(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Body::Json(_) => None,
            Body::Raw(text) => Some(text),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Json(value) => write!(f, "{value}"),
            Body::Raw(text) => write!(f, "{text:?}"),
        }
    }
}

/// Status, headers and decoded body of one completed call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl ResponseEnvelope {
    pub fn from_response(response: HttpResponse) -> Self {
        let body = Body::decode(&response.body);
        Self {
            status: response.status,
            headers: response.headers,
            body,
        }
    }

    /// Every value sent for `name`, in arrival order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }

    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_values("set-cookie")
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status={} headers=[", self.status)?;
        for (i, (key, value)) in self.headers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "] body={}", self.body)
    }
}
