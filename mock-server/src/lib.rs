use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::State,
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const MONTHLY_SUMMARY_PATH: &str = "/api/attendance/monthly-summary";
pub const SESSION_COOKIE: &str = "sid";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub ok: bool,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: String,
    pub total_employees: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub late_days: u32,
}

impl MonthlySummary {
    fn sample() -> Self {
        Self {
            month: "2024-05".to_string(),
            total_employees: 12,
            present_days: 214,
            absent_days: 9,
            late_days: 17,
        }
    }
}

/// Switches for the failure modes the probe needs to observe.
#[derive(Clone, Debug)]
pub struct MockBehavior {
    /// Send `set-cookie` on a successful login.
    pub issue_cookie: bool,
    /// Answer the summary endpoint with a plain-text 500.
    pub summary_failure: bool,
    /// Answer a successful login with `302 Location: /home` and an empty body.
    pub login_redirect: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            issue_cookie: true,
            summary_failure: false,
            login_redirect: false,
        }
    }
}

/// Per-endpoint request counters.
#[derive(Debug, Default)]
pub struct Hits {
    login: AtomicUsize,
    summary: AtomicUsize,
}

impl Hits {
    pub fn login(&self) -> usize {
        self.login.load(Ordering::SeqCst)
    }

    pub fn summary(&self) -> usize {
        self.summary.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct MockState {
    pub behavior: MockBehavior,
    pub sessions: Arc<RwLock<HashSet<String>>>,
    pub hits: Arc<Hits>,
}

impl MockState {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }
}

pub fn app() -> Router {
    app_with(MockState::default())
}

pub fn app_with(state: MockState) -> Router {
    Router::new()
        .route(LOGIN_PATH, post(login))
        .route(MONTHLY_SUMMARY_PATH, get(monthly_summary))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockState::default()).await
}

pub async fn run_with(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

async fn login(State(state): State<MockState>, Json(input): Json<LoginRequest>) -> Response {
    state.hits.login.fetch_add(1, Ordering::SeqCst);

    if input.username != ADMIN_USERNAME || input.password != ADMIN_PASSWORD {
        info!(username = %input.username, "login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid credentials" })),
        )
            .into_response();
    }

    if state.behavior.login_redirect {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("/home"));
        if state.behavior.issue_cookie {
            let cookie = open_session(&state).await;
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.insert(SET_COOKIE, value);
            }
        }
        return (StatusCode::FOUND, headers).into_response();
    }

    let body = Json(LoginResponse {
        ok: true,
        user: User {
            username: input.username,
            role: "admin".to_string(),
        },
    });
    if !state.behavior.issue_cookie {
        return (StatusCode::OK, body).into_response();
    }

    let cookie = open_session(&state).await;
    (StatusCode::OK, [(SET_COOKIE, cookie)], body).into_response()
}

/// Register a new session and return its `set-cookie` value.
async fn open_session(state: &MockState) -> String {
    let sid = Uuid::new_v4().to_string();
    state.sessions.write().await.insert(sid.clone());
    info!(%sid, "session opened");
    format!("{SESSION_COOKIE}={sid}; Path=/; HttpOnly")
}

async fn monthly_summary(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.hits.summary.fetch_add(1, Ordering::SeqCst);

    if state.behavior.summary_failure {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let authenticated = match session_id(&headers) {
        Some(sid) => state.sessions.read().await.contains(&sid),
        None => false,
    };
    if !authenticated {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "not authenticated" })),
        )
            .into_response();
    }
    Json(MonthlySummary::sample()).into_response()
}

/// Pull the session id out of every `cookie` header on the request.
fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
