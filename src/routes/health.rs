use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::utils::time::now;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; `database` reports store availability")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.store() {
        Ok(store) => match sqlx::query("SELECT 1").execute(store.pool()).await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::warn!(error = %e, "health check query failed");
                "error"
            }
        },
        Err(_) => "unavailable",
    };

    let body = json!({
        "status": "healthy",
        "timestamp": now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    });
    (StatusCode::OK, Json(body))
}
