use axum::http::{header, HeaderMap, HeaderValue};
use helpdesk_core::SessionId;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";

/// First non-empty `session_id` value across all `Cookie` headers.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(name, value)| {
            let value = value.trim().trim_matches('"');
            (name.trim() == SESSION_COOKIE && !value.is_empty()).then(|| SessionId::new(value))
        })
}

pub fn issue_session_id() -> SessionId {
    SessionId::new(Uuid::new_v4().to_string())
}

pub fn session_cookie(session_id: &SessionId) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        session_id.as_str()
    ))
    .ok()
}
