use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use quickparts_api as api;

use api::auth::{AuthConfig, AuthService};
use api::services::catalog::CatalogService;
use api::services::orders::OrderService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    // One store client for the whole process, injected into every service.
    let db = api::db::connect(&cfg).await?;

    tokio::fs::create_dir_all(&cfg.upload_dir)
        .await
        .with_context(|| format!("failed to create upload directory {}", cfg.upload_dir))?;

    let notifier =
        api::notifications::build_notifier(&cfg).context("failed to build order notifier")?;

    let auth_service = Arc::new(AuthService::new(
        AuthConfig::new(cfg.jwt_secret.clone()),
        db.clone(),
    ));

    let app_state = api::AppState {
        config: cfg.clone(),
        auth: auth_service.clone(),
        catalog: CatalogService::new(db.clone()),
        orders: OrderService::new(db, notifier),
    };

    // Build CORS layer from config
    let cors_layer = match cfg.cors_origins() {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
                .allow_credentials(cfg.cors_allow_credentials)
        }
        None => {
            info!("no CORS origins configured; allowing any origin");
            CorsLayer::permissive()
        }
    };

    let app = Router::new()
        .route("/", get(api::handlers::health))
        .nest("/api", api::handlers::api_routes(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host: IpAddr = cfg.host.parse().context("invalid host address")?;
    let addr = SocketAddr::new(host, cfg.port);
    info!("QuickParts API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
