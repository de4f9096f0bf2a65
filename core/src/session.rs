//! Authentication context carried from the login call to later calls.
//!
//! A `Session` keeps the raw `set-cookie` values of a login response and
//! renders them back as a single `cookie` request header.

use crate::envelope::ResponseEnvelope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    set_cookies: Vec<String>,
}

impl Session {
    /// Capture the session from a login response. `None` when the response
    /// set no cookie.
    pub fn from_envelope(envelope: &ResponseEnvelope) -> Option<Self> {
        let set_cookies: Vec<String> = envelope
            .set_cookies()
            .into_iter()
            .map(str::to_string)
            .collect();
        if set_cookies.is_empty() {
            None
        } else {
            Some(Self { set_cookies })
        }
    }

    /// The first `set-cookie` value exactly as the server sent it.
    pub fn primary_cookie(&self) -> &str {
        &self.set_cookies[0]
    }

    pub fn set_cookies(&self) -> &[String] {
        &self.set_cookies
    }

    /// Value for the `cookie` request header: the `name=value` part of each
    /// cookie, attributes dropped, joined with `"; "`.
    pub fn cookie_header(&self) -> String {
        self.set_cookies
            .iter()
            .filter_map(|c| c.split(';').next())
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Headers to attach to an authenticated request.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![("cookie".to_string(), self.cookie_header())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Body;

    fn envelope(headers: &[(&str, &str)]) -> ResponseEnvelope {
        ResponseEnvelope {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Body::Raw(String::new()),
        }
    }

    #[test]
    fn no_set_cookie_means_no_session() {
        assert!(Session::from_envelope(&envelope(&[("content-type", "text/plain")])).is_none());
    }

    #[test]
    fn attributes_are_stripped_from_cookie_header() {
        let session = Session::from_envelope(&envelope(&[
            ("set-cookie", "sid=abc123; Path=/; HttpOnly"),
            ("set-cookie", "theme=dark"),
        ]))
        .unwrap();
        assert_eq!(session.primary_cookie(), "sid=abc123; Path=/; HttpOnly");
        assert_eq!(session.cookie_header(), "sid=abc123; theme=dark");
        assert_eq!(
            session.headers(),
            vec![("cookie".to_string(), "sid=abc123; theme=dark".to_string())]
        );
    }
}
