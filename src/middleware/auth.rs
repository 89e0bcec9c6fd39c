use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::services::admin_gate::{AdminGate, SessionId};

pub const SESSION_COOKIE: &str = "admin_session";

/// Reads the admin session id from `Authorization: Bearer` or the session cookie.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        return Some(SessionId::from(token.to_string()));
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| SessionId::from(value.to_string()))
}

pub fn session_cookie(session: &SessionId, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        session.as_str(),
        max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Rejects the request before any handler runs unless the session is authenticated.
pub async fn require_admin(State(gate): State<AdminGate>, req: Request, next: Next) -> Response {
    let session = session_from_headers(req.headers());
    if !gate.is_authenticated(session.as_ref()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized"})),
        )
            .into_response();
    }
    next.run(req).await
}
