use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::time::now;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub total_visits: u64,
    pub unique_visitors: u64,
    pub popular_pages: Vec<String>,
    pub last_visit: Option<String>,
    pub last_updated: String,
}

#[utoipa::path(
    get,
    path = "/api/analytics",
    responses(
        (status = 200, description = "Visit counters since process start", body = AnalyticsResponse)
    )
)]
pub async fn analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    let summary = state.analytics.summary();
    Json(AnalyticsResponse {
        total_visits: summary.total_visits,
        unique_visitors: summary.unique_visitors,
        popular_pages: Vec::from(["home", "projects", "contact"].map(String::from)),
        last_visit: summary.last_visit.map(|at| at.to_rfc3339()),
        last_updated: now().to_rfc3339(),
    })
}
