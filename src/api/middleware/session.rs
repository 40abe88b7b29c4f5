//! Cookie-backed session identity

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::domain::SessionId;

const MAX_SESSION_ID_LENGTH: usize = 128;

/// Cookie settings for session identity
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            secure: config.secure,
        }
    }
}

impl SessionSettings {
    fn cookie(&self, session: &SessionId) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name, session
        );

        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie
    }
}

/// Returned by a handler to replace the caller's session
#[derive(Debug, Clone)]
pub struct RenewedSession(pub SessionId);

fn is_acceptable_session_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SESSION_ID_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Session id carried by the request's cookie header, if any
fn session_from_cookies(request: &Request<Body>, cookie_name: &str) -> Option<SessionId> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim())
        .filter(|value| is_acceptable_session_id(value))
        .map(SessionId::new)
}

/// Resolve the caller's session, issuing a fresh one when absent
///
/// Handlers read the id from request extensions. The cookie is written when
/// the id was issued here or when a handler returned a `RenewedSession`.
pub async fn session_middleware(
    State(settings): State<SessionSettings>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let (session, issued) = match session_from_cookies(&request, &settings.cookie_name) {
        Some(session) => (session, false),
        None => {
            let session = SessionId::generate();
            debug!(session = %session, "Issued new session");
            (session, true)
        }
    };

    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    let outgoing = match response.extensions_mut().remove::<RenewedSession>() {
        Some(RenewedSession(renewed)) => Some(renewed),
        None if issued => Some(session),
        None => None,
    };

    if let Some(session) = outgoing {
        match HeaderValue::from_str(&settings.cookie(&session)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Failed to encode session cookie"),
        }
    }

    response
}
