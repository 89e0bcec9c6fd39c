use std::net::SocketAddr;
use std::path::Path;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::AppState;

/// Portfolio homepage; every hit is counted for the analytics endpoint.
pub async fn home(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
) -> Response {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let ip = connect_info.map(|ConnectInfo(addr)| addr.ip());
    state.analytics.track_visit("home", user_agent, ip);

    let index = Path::new(&state.config.static_dir).join("index.html");
    match ServeFile::new(index).oneshot(req).await {
        Ok(resp) => resp.into_response(),
        Err(never) => match never {},
    }
}
