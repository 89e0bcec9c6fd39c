use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::dto::contact_dto::{ContactRequest, ContactResponse};
use crate::error::{Error, Result};
use crate::models::message::NewMessage;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message stored", body = ContactResponse),
        (status = 202, description = "Store unavailable, message forwarded only", body = ContactResponse),
        (status = 400, description = "Invalid submission"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 503, description = "Message store unavailable")
    )
)]
#[axum::debug_handler]
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!(error = %e, "rejected contact payload");
        Error::BadRequest("No data provided".to_string())
    })?;
    let payload = payload.trimmed();
    payload.validate()?;

    let msg = NewMessage::from(payload);
    let stored = match state.store() {
        Ok(store) => store.create(&msg).await,
        Err(e) => Err(e),
    };

    // The forward is independent of the store write and never awaited.
    let email = msg.email.clone();
    state.notifier.notify(msg);

    match stored {
        Ok(id) => {
            tracing::info!(email = %email, message_id = id, "contact form submitted");
            Ok(Json(ContactResponse {
                message: "Message sent successfully!".to_string(),
                id: Some(id),
                stored: true,
            })
            .into_response())
        }
        Err(e) if state.notifier.is_enabled() => {
            tracing::error!(error = %e, "failed to store contact message, forwarded only");
            Ok((
                StatusCode::ACCEPTED,
                Json(ContactResponse {
                    message: "Message received".to_string(),
                    id: None,
                    stored: false,
                }),
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store contact message");
            Err(e)
        }
    }
}
