use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::message::Message;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageListQuery {
    /// Maximum number of messages, 50 when omitted.
    pub limit: Option<u32>,
    /// Return every message, ignoring `limit`.
    #[serde(default)]
    pub all: bool,
    /// Only unread messages, ignoring `limit`.
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
}
