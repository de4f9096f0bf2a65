//! Probe configuration.
//!
//! Defaults target the attendance service on `localhost:5000` with the
//! built-in admin account. Each field can be overridden from the process
//! environment (a `.env` file is honoured):
//!
//! - `PROBE_HOST`, `PROBE_PORT`
//! - `PROBE_USERNAME`, `PROBE_PASSWORD`
//! - `PROBE_TIMEOUT_SECS` (`0` waits forever)
//! - `PROBE_FORWARD_SESSION` (`true`/`false`, `1`/`0`)

use std::time::Duration;

use crate::error::ProbeError;
use crate::types::Credentials;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    pub timeout: Option<Duration>,
    pub forward_session: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            credentials: Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD),
            timeout: Some(DEFAULT_TIMEOUT),
            forward_session: false,
        }
    }
}

impl ProbeConfig {
    /// Load `.env` if present, then apply environment overrides.
    pub fn from_env() -> Result<Self, ProbeError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProbeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("PROBE_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PROBE_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ProbeError::Config(format!("PROBE_PORT: not a port: {port:?}")))?;
        }
        if let Some(username) = lookup("PROBE_USERNAME") {
            config.credentials.username = username;
        }
        if let Some(password) = lookup("PROBE_PASSWORD") {
            config.credentials.password = password;
        }
        if let Some(secs) = lookup("PROBE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ProbeError::Config(format!("PROBE_TIMEOUT_SECS: not a number: {secs:?}"))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(flag) = lookup("PROBE_FORWARD_SESSION") {
            config.forward_session = parse_flag(&flag).ok_or_else(|| {
                ProbeError::Config(format!("PROBE_FORWARD_SESSION: not a boolean: {flag:?}"))
            })?;
        }
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
