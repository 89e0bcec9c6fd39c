use std::path::Path as FsPath;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::dto::admin_dto::{ActionResponse, LoginForm, MessageListQuery, MessageListResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::{clear_session_cookie, session_cookie, session_from_headers};
use crate::models::message::{Message, MessageStats};
use crate::services::admin_gate::SessionId;
use crate::AppState;

const LOGIN_PATH: &str = "/admin/login";
const LOGIN_FAILED_PATH: &str = "/admin/login?error=1";
const DASHBOARD_PATH: &str = "/admin";

fn redirect(location: &str, cookie: Option<String>) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, value);
    }
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        headers.insert(header::SET_COOKIE, value);
    }
    (StatusCode::FOUND, headers).into_response()
}

/// Browsers posting the login form get redirects; API clients asking for JSON get status codes.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

async fn serve_page(state: &AppState, page: &str, req: Request) -> Response {
    let path = FsPath::new(&state.config.static_dir).join(page);
    match ServeFile::new(path).oneshot(req).await {
        Ok(resp) => resp.into_response(),
        Err(never) => match never {},
    }
}

/// Path ids are opaque text; anything that is not an integer names no message.
fn parse_message_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::NotFound("Message not found".to_string()))
}

pub async fn login_page(State(state): State<AppState>, req: Request) -> Response {
    serve_page(&state, "admin/login.html", req).await
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    // Each successful login gets a fresh id so a pre-existing cookie is never promoted.
    if let Some(previous) = session_from_headers(&headers) {
        state.gate.deauthenticate(&previous);
    }

    let session = SessionId::generate();
    if !state.gate.authenticate(&session, &form.password) {
        tracing::warn!("admin login rejected");
        if wants_json(&headers) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid password"})),
            )
                .into_response();
        }
        return redirect(LOGIN_FAILED_PATH, None);
    }

    let cookie = session_cookie(
        &session,
        state.config.admin_session_timeout_secs,
        state.config.cookie_secure,
    );
    redirect(DASHBOARD_PATH, Some(cookie))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session) = session_from_headers(&headers) {
        state.gate.deauthenticate(&session);
        tracing::info!("admin logged out");
    }
    redirect(LOGIN_PATH, Some(clear_session_cookie()))
}

pub async fn dashboard(State(state): State<AppState>, req: Request) -> Response {
    let session = session_from_headers(req.headers());
    if !state.gate.is_authenticated(session.as_ref()) {
        return redirect(LOGIN_PATH, None);
    }
    serve_page(&state, "admin/dashboard.html", req).await
}

#[utoipa::path(
    get,
    path = "/api/admin/messages",
    params(MessageListQuery),
    responses(
        (status = 200, description = "Messages, newest first", body = MessageListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<MessageListResponse>> {
    let store = state.store()?;
    let messages = if query.unread {
        store.list_unread().await?
    } else if query.all {
        store.list_all().await?
    } else {
        store.list(query.limit).await?
    };
    Ok(Json(MessageListResponse {
        count: messages.len(),
        messages,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/messages/{id}",
    params(("id" = String, Path, description = "Message ID")),
    responses(
        (status = 200, description = "The message", body = Message),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Message not found")
    )
)]
#[axum::debug_handler]
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let id = parse_message_id(&id)?;
    state
        .store()?
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound("Message not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/admin/messages/{id}/read",
    params(("id" = String, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked as read", body = ActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Message not found or already read")
    )
)]
#[axum::debug_handler]
pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>> {
    let id = parse_message_id(&id)?;
    if !state.store()?.mark_read(id).await? {
        return Err(Error::NotFound(
            "Message not found or already read".to_string(),
        ));
    }
    Ok(Json(ActionResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/messages/{id}",
    params(("id" = String, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted", body = ActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Message not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>> {
    let id = parse_message_id(&id)?;
    if !state.store()?.delete(id).await? {
        return Err(Error::NotFound("Message not found".to_string()));
    }
    Ok(Json(ActionResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Message counts", body = MessageStats),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn message_stats(State(state): State<AppState>) -> Result<Json<MessageStats>> {
    Ok(Json(state.store()?.stats().await?))
}
