//! Console probe for the attendance service's login and monthly-summary
//! endpoints.
//!
//! # Overview
//! `ApiClient` builds one `HttpRequest` per call, a `Transport` sends it, and
//! the reply comes back as a `ResponseEnvelope` whose body is JSON when it
//! parses and raw text when it does not. `run_scenario` strings two calls
//! together: log in, then fetch the monthly summary if a session cookie was
//! set.
//!
//! # Design
//! - Calls are blocking and strictly sequential; every call opens its own
//!   connection.
//! - Nothing is retried. Timeouts are explicit (`ProbeError::Timeout`).
//! - Authentication is passed explicitly as a `Session`.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod scenario;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{ApiClient, LOGIN_PATH, MONTHLY_SUMMARY_PATH};
pub use config::ProbeConfig;
pub use envelope::{Body, ResponseEnvelope};
pub use error::ProbeError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use scenario::{run_scenario, ScenarioOptions, ScenarioOutcome};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::Credentials;
