use portfolio_backend::{
    app,
    config::{get_config, init_config},
    database::pool::create_pool,
    services::message_service::MessageStore,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config();

    // A broken database must not take the whole site down.
    let store = match create_pool(&config.database_url).await {
        Ok(pool) => match MessageStore::init(pool).await {
            Ok(store) => Some(store),
            Err(e) => {
                error!(error = %e, "failed to initialize message store, running degraded");
                None
            }
        },
        Err(e) => {
            error!(error = %e, "failed to open database, running degraded");
            None
        }
    };

    if config.message_server_url.is_none() {
        info!("MESSAGE_SERVER_URL not set, contact forwarding disabled");
    }

    let app_state = AppState::new(config, store)?;
    let app = app(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
