pub mod admin_gate;
pub mod analytics_service;
pub mod message_service;
pub mod notification_service;
