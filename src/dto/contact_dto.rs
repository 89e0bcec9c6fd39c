use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::message::NewMessage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 2, message = "Name must be at least 2 characters long"))]
    pub name: String,
    #[serde(default)]
    #[validate(contains(pattern = "@", message = "Please provide a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 10, message = "Message must be at least 10 characters long"))]
    pub message: String,
}

impl ContactRequest {
    /// Strips surrounding whitespace so length rules apply to the visible text.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

impl From<ContactRequest> for NewMessage {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            message: req.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub message: String,
    pub id: Option<i64>,
    pub stored: bool,
}
