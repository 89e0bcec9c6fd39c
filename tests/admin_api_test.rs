use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use portfolio_backend::{
    config::{parse_site_url, Config},
    database::pool::create_pool,
    models::message::NewMessage,
    services::message_service::MessageStore,
    AppState,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: "sqlite::memory:".into(),
        admin_password: "admin123".into(),
        admin_session_timeout_secs: 3600,
        contact_rate_limit: 100,
        public_rate_limit: 1000,
        message_server_url: None,
        message_server_password: None,
        site_url: parse_site_url("https://example.com/").unwrap(),
        static_dir: "static".into(),
        cookie_secure: false,
    }
}

async fn setup_app() -> (Router, MessageStore) {
    let pool = create_pool("sqlite::memory:").await.expect("pool");
    let store = MessageStore::init(pool).await.expect("store");
    let state = AppState::new(&test_config(), Some(store.clone())).expect("state");
    (portfolio_backend::app(state), store)
}

async fn seed(store: &MessageStore, name: &str) -> i64 {
    store
        .create(&NewMessage {
            name: name.into(),
            email: "ann@x.com".into(),
            message: "Hello there, this is a test".into(),
        })
        .await
        .expect("seed message")
}

async fn login(app: &Router, password: &str) -> Response {
    let req = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("password={}", password)))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// Logs in and returns the `name=value` pair to send back as a Cookie header.
async fn login_cookie(app: &Router) -> String {
    let resp = login(app, "admin123").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(resp: Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn admin_api_denies_uniformly_without_session() {
    let (app, store) = setup_app().await;
    let id = seed(&store, "Ann").await;

    let existing = format!("/api/admin/messages/{}", id);
    let existing_read = format!("/api/admin/messages/{}/read", id);
    let cases = [
        ("GET", "/api/admin/messages"),
        ("GET", "/api/admin/stats"),
        ("GET", existing.as_str()),
        ("GET", "/api/admin/messages/999"),
        ("POST", existing_read.as_str()),
        ("POST", "/api/admin/messages/999/read"),
        ("DELETE", existing.as_str()),
        ("DELETE", "/api/admin/messages/999"),
    ];

    for (method, uri) in cases {
        let resp = send(&app, method, uri, Some("admin_session=forged")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(json_body(resp).await["error"], "unauthorized");
    }

    // Nothing was touched by the denied calls.
    let stats = store.stats().await.unwrap();
    assert_eq!((stats.total, stats.unread), (1, 1));
}

#[tokio::test]
async fn wrong_password_does_not_open_a_session() {
    let (app, _) = setup_app().await;

    let resp = login(&app, "wrong").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/admin/login?error=1");
    assert!(resp.headers().get(header::SET_COOKIE).is_none());

    let req = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body(Body::from("password=wrong"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(json_body(resp).await["error"], "Invalid password");

    let resp = send(&app, "GET", "/admin", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/admin/login");
}

#[tokio::test]
async fn admin_flow_end_to_end() {
    let (app, store) = setup_app().await;
    let first = seed(&store, "Ann").await;
    let second = seed(&store, "Bob").await;

    let cookie = login_cookie(&app).await;
    let cookie = Some(cookie.as_str());

    let resp = send(&app, "GET", "/api/admin/messages", cookie).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["messages"][0]["id"], second);
    assert_eq!(body["messages"][1]["read"], false);

    let uri = format!("/api/admin/messages/{}/read", first);
    let resp = send(&app, "POST", &uri, cookie).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["success"], true);
    let resp = send(&app, "POST", &uri, cookie).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "GET", "/api/admin/messages?unread=true", cookie).await;
    let body = json_body(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["messages"][0]["id"], second);

    let resp = send(&app, "GET", "/api/admin/stats", cookie).await;
    let body = json_body(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["unread"], 1);
    assert_eq!(body["read"], 1);

    let uri = format!("/api/admin/messages/{}", first);
    let resp = send(&app, "DELETE", &uri, cookie).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, "DELETE", &uri, cookie).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(&app, "GET", &uri, cookie).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "GET", "/api/admin/messages/not-a-number", cookie).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "GET", "/admin/logout", cookie).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/admin/login");

    let resp = send(&app, "GET", "/api/admin/stats", cookie).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_session_is_accepted() {
    let (app, store) = setup_app().await;
    seed(&store, "Ann").await;
    let cookie = login_cookie(&app).await;
    let token = cookie.trim_start_matches("admin_session=");

    let req = Request::builder()
        .method("GET")
        .uri("/api/admin/stats")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["total"], 1);
}

#[tokio::test]
async fn list_respects_limit_and_all() {
    let (app, store) = setup_app().await;
    for i in 0..55 {
        seed(&store, &format!("User{}", i)).await;
    }
    let cookie = login_cookie(&app).await;
    let cookie = Some(cookie.as_str());

    let body = json_body(send(&app, "GET", "/api/admin/messages", cookie).await).await;
    assert_eq!(body["count"], 50);
    let body = json_body(send(&app, "GET", "/api/admin/messages?limit=5", cookie).await).await;
    assert_eq!(body["count"], 5);
    let body = json_body(send(&app, "GET", "/api/admin/messages?all=true", cookie).await).await;
    assert_eq!(body["count"], 55);
}

#[tokio::test]
async fn degraded_store_reports_unavailable_after_auth() {
    let state = AppState::new(&test_config(), None).expect("state");
    let app = portfolio_backend::app(state);
    let cookie = login_cookie(&app).await;

    let resp = send(&app, "GET", "/api/admin/stats", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
