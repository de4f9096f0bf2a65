//! The login-then-summary probe.
//!
//! # Design
//! Two calls, strictly in order, with one early exit:
//! 1. `POST /api/auth/login` with the configured credentials.
//! 2. If the login set no cookie, stop. Otherwise
//!    `GET /api/attendance/monthly-summary`, exactly once.
//!
//! The summary call is sent without the session unless
//! `ScenarioOptions::forward_session` is set. Both envelopes are returned so
//! callers (and tests) can inspect what the server said.

use tracing::info;

use crate::client::ApiClient;
use crate::config::ProbeConfig;
use crate::envelope::ResponseEnvelope;
use crate::error::ProbeError;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::Credentials;

#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    pub credentials: Credentials,
    /// Attach the login cookie to the summary call.
    pub forward_session: bool,
}

impl From<&ProbeConfig> for ScenarioOptions {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            credentials: config.credentials.clone(),
            forward_session: config.forward_session,
        }
    }
}

/// How a run ended. Neither case is a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    /// The login response carried no `set-cookie`; no summary call was made.
    NoSessionCookie { login: ResponseEnvelope },
    Completed {
        login: ResponseEnvelope,
        session: Session,
        summary: ResponseEnvelope,
    },
}

impl ScenarioOutcome {
    pub fn login(&self) -> &ResponseEnvelope {
        match self {
            ScenarioOutcome::NoSessionCookie { login } => login,
            ScenarioOutcome::Completed { login, .. } => login,
        }
    }

    pub fn summary(&self) -> Option<&ResponseEnvelope> {
        match self {
            ScenarioOutcome::NoSessionCookie { .. } => None,
            ScenarioOutcome::Completed { summary, .. } => Some(summary),
        }
    }
}

pub fn run_scenario<T: Transport>(
    client: &ApiClient<T>,
    options: &ScenarioOptions,
) -> Result<ScenarioOutcome, ProbeError> {
    info!(username = %options.credentials.username, "Step 1: login");
    let login = client.login(&options.credentials)?;
    info!(status = login.status, "Login response: {}", login.body);

    let Some(session) = Session::from_envelope(&login) else {
        info!("No session cookie set, stopping before the summary call");
        return Ok(ScenarioOutcome::NoSessionCookie { login });
    };
    info!("Session cookie: {}", session.primary_cookie());

    info!(forward_session = options.forward_session, "Step 2: monthly summary");
    let forwarded = options.forward_session.then_some(&session);
    let summary = client.monthly_summary(forwarded)?;
    info!("Monthly summary response: {summary}");

    Ok(ScenarioOutcome::Completed {
        login,
        session,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::client::{LOGIN_PATH, MONTHLY_SUMMARY_PATH};
    use crate::envelope::Body;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Answers by path and records every request in order.
    #[derive(Default)]
    struct Scripted {
        routes: HashMap<&'static str, HttpResponse>,
        log: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn on(mut self, path: &'static str, status: u16, headers: &[(&str, &str)], body: &str) -> Self {
            self.routes.insert(
                path,
                HttpResponse {
                    status,
                    headers: headers
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    body: body.as_bytes().to_vec(),
                },
            );
            self
        }

        fn hits(&self, path: &str) -> usize {
            self.log.borrow().iter().filter(|r| r.path == path).count()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ProbeError> {
            self.log.borrow_mut().push(request.clone());
            self.routes
                .get(request.path.as_str())
                .cloned()
                .ok_or_else(|| ProbeError::InvalidRequest(format!("unscripted {}", request.path)))
        }
    }

    fn options(forward_session: bool) -> ScenarioOptions {
        ScenarioOptions {
            credentials: Credentials::new("admin", "admin123"),
            forward_session,
        }
    }

    #[test]
    fn cookie_present_leads_to_one_summary_call() {
        let transport = Scripted::default()
            .on(LOGIN_PATH, 200, &[("set-cookie", "sid=abc123")], r#"{"ok":true}"#)
            .on(MONTHLY_SUMMARY_PATH, 200, &[], r#"{"month":"2024-05"}"#);
        let client = ApiClient::new("localhost", 5000, &transport);

        let outcome = run_scenario(&client, &options(false)).unwrap();

        assert_eq!(outcome.login().body, Body::Json(json!({ "ok": true })));
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.body, Body::Json(json!({ "month": "2024-05" })));
        assert_eq!(transport.hits(LOGIN_PATH), 1);
        assert_eq!(transport.hits(MONTHLY_SUMMARY_PATH), 1);

        let log = transport.log.borrow();
        assert_eq!(log[0].method, HttpMethod::Post);
        assert_eq!(log[1].method, HttpMethod::Get);
        assert!(log[1].header("cookie").is_none(), "cookie must not be forwarded by default");
    }

    #[test]
    fn missing_cookie_stops_after_login() {
        let transport = Scripted::default().on(
            LOGIN_PATH,
            401,
            &[],
            r#"{"error":"invalid credentials"}"#,
        );
        let client = ApiClient::new("localhost", 5000, &transport);

        for _ in 0..2 {
            let outcome = run_scenario(&client, &options(false)).unwrap();
            assert!(matches!(outcome, ScenarioOutcome::NoSessionCookie { .. }));
            assert_eq!(
                outcome.login().body,
                Body::Json(json!({ "error": "invalid credentials" }))
            );
        }
        assert_eq!(transport.hits(LOGIN_PATH), 2);
        assert_eq!(transport.hits(MONTHLY_SUMMARY_PATH), 0);
    }

    #[test]
    fn summary_call_happens_whatever_the_cookie_value() {
        let transport = Scripted::default()
            .on(LOGIN_PATH, 401, &[("set-cookie", "garbage")], "denied")
            .on(MONTHLY_SUMMARY_PATH, 500, &[], "Internal Server Error");
        let client = ApiClient::new("localhost", 5000, &transport);

        let outcome = run_scenario(&client, &options(false)).unwrap();

        let summary = outcome.summary().unwrap();
        assert_eq!(summary.status, 500);
        assert_eq!(summary.body, Body::Raw("Internal Server Error".to_string()));
        assert_eq!(transport.hits(MONTHLY_SUMMARY_PATH), 1);
    }

    #[test]
    fn forwarded_session_attaches_cookie() {
        let transport = Scripted::default()
            .on(LOGIN_PATH, 200, &[("set-cookie", "sid=abc123; Path=/; HttpOnly")], "{}")
            .on(MONTHLY_SUMMARY_PATH, 200, &[], "{}");
        let client = ApiClient::new("localhost", 5000, &transport);

        run_scenario(&client, &options(true)).unwrap();

        let log = transport.log.borrow();
        assert_eq!(log[1].header("cookie"), Some("sid=abc123"));
    }

    #[test]
    fn transport_failure_propagates() {
        let transport = Scripted::default();
        let client = ApiClient::new("localhost", 5000, &transport);
        let err = run_scenario(&client, &options(false)).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidRequest(_)));
        assert_eq!(transport.hits(MONTHLY_SUMMARY_PATH), 0);
    }
}
