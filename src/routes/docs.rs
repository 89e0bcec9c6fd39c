use axum::Json;
use utoipa::OpenApi;

use crate::dto::admin_dto::{ActionResponse, MessageListResponse};
use crate::dto::contact_dto::{ContactRequest, ContactResponse};
use crate::models::message::{Message, MessageStats};
use crate::routes::analytics::AnalyticsResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::contact::submit_contact,
        crate::routes::admin::list_messages,
        crate::routes::admin::get_message,
        crate::routes::admin::mark_message_read,
        crate::routes::admin::delete_message,
        crate::routes::admin::message_stats,
        crate::routes::analytics::analytics,
        crate::routes::health::health,
    ),
    components(schemas(
        ContactRequest,
        ContactResponse,
        Message,
        MessageStats,
        MessageListResponse,
        ActionResponse,
        AnalyticsResponse,
    ))
)]
pub struct ApiDoc;

pub async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
