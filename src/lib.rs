pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::middleware::{
    auth::require_admin,
    rate_limit::{rate_limit_middleware, RateLimiter},
    security_headers::with_security_headers,
};
use crate::services::{
    admin_gate::AdminGate,
    analytics_service::AnalyticsService,
    message_service::MessageStore,
    notification_service::{DisabledNotifier, HttpNotifier, Notifier},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when the store failed to initialize; the site keeps serving in degraded mode.
    pub store: Option<MessageStore>,
    pub gate: AdminGate,
    pub notifier: Arc<dyn Notifier>,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(config: &Config, store: Option<MessageStore>) -> Result<Self> {
        let notifier: Arc<dyn Notifier> = match &config.message_server_url {
            Some(url) => Arc::new(HttpNotifier::new(
                url.clone(),
                config.message_server_password.clone(),
            )?),
            None => Arc::new(DisabledNotifier),
        };
        let gate = AdminGate::new(
            config.admin_password.clone(),
            Duration::from_secs(config.admin_session_timeout_secs),
        );

        Ok(Self {
            config: Arc::new(config.clone()),
            store,
            gate,
            notifier,
            analytics: AnalyticsService::new(),
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> Result<&MessageStore> {
        self.store.as_ref().ok_or(Error::StoreUnavailable)
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let contact_api = Router::new()
        .route("/api/contact", post(routes::contact::submit_contact))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::per_minute(config.contact_rate_limit),
            rate_limit_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/admin/messages", get(routes::admin::list_messages))
        .route(
            "/api/admin/messages/:id",
            get(routes::admin::get_message).delete(routes::admin::delete_message),
        )
        .route(
            "/api/admin/messages/:id/read",
            post(routes::admin::mark_message_read),
        )
        .route("/api/admin/stats", get(routes::admin::message_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.gate.clone(),
            require_admin,
        ));

    let admin_pages = Router::new()
        .route("/admin", get(routes::admin::dashboard))
        .route(
            "/admin/login",
            get(routes::admin::login_page).post(routes::admin::login),
        )
        .route(
            "/admin/logout",
            get(routes::admin::logout).post(routes::admin::logout),
        );

    let public = Router::new()
        .route("/", get(routes::pages::home))
        .route("/health", get(routes::health::health))
        .route("/api/analytics", get(routes::analytics::analytics))
        .route("/api/docs", get(routes::docs::api_docs))
        .route("/sitemap.xml", get(routes::seo::sitemap))
        .route("/robots.txt", get(routes::seo::robots));

    let router = public
        .merge(contact_api)
        .merge(admin_api)
        .merge(admin_pages)
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::per_day(config.public_rate_limit),
            rate_limit_middleware,
        ))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http());

    with_security_headers(router)
}
