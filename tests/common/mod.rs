//! Shared helpers for HTTP-level tests.
//!
//! The router is exercised through `tower::ServiceExt::oneshot`, so tests
//! that never reach the store (auth rejections, body-shape errors, upload
//! serving) run without any MongoDB instance. Flows that persist data are
//! marked `#[ignore]` and expect a local server.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use mongodb::{Client, Database};
use serde_json::Value;
use tower::ServiceExt;

use quickparts_api::auth::{AuthConfig, AuthService};
use quickparts_api::config::AppConfig;
use quickparts_api::handlers;
use quickparts_api::notifications::DisabledNotifier;
use quickparts_api::services::catalog::CatalogService;
use quickparts_api::services::orders::OrderService;
use quickparts_api::AppState;

pub const TEST_JWT_SECRET: &str = "quickparts_integration_test_secret";

pub fn test_config(upload_dir: &str) -> AppConfig {
    AppConfig {
        mongo_url: "mongodb://127.0.0.1:27017".to_string(),
        db_name: "quickparts_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        log_json: false,
        cors_allowed_origins: None,
        cors_allow_credentials: false,
        upload_dir: upload_dir.to_string(),
        smtp_host: None,
        smtp_port: 587,
        smtp_username: None,
        smtp_password: None,
        notification_email: "orders@example.com".to_string(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub auth: Arc<AuthService>,
    pub db: Database,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config("uploads")).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        // The driver connects lazily; building the app is offline.
        let client = Client::with_uri_str(&config.mongo_url)
            .await
            .expect("mongo client");
        let db = client.database(&config.db_name);

        let auth = Arc::new(AuthService::new(
            AuthConfig::new(config.jwt_secret.clone()),
            db.clone(),
        ));
        let state = AppState {
            config,
            auth: auth.clone(),
            catalog: CatalogService::new(db.clone()),
            orders: OrderService::new(db.clone(), Arc::new(DisabledNotifier)),
        };

        let router = Router::new()
            .route("/", get(handlers::health))
            .nest("/api", handlers::api_routes(auth.clone()))
            .with_state(state);

        Self { router, auth, db }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Raw request with full control over headers and body.
    pub async fn raw_request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Bootstrap sample data and log in as the default admin.
    pub async fn admin_token(&self) -> String {
        let response = self
            .request(Method::POST, "/api/admin/init-sample-data", None, None)
            .await;
        assert!(response.status().is_success(), "bootstrap failed");

        let response = self
            .request(
                Method::POST,
                "/api/admin/login",
                Some(serde_json::json!({"username": "admin", "password": "admin123"})),
                None,
            )
            .await;
        assert_eq!(response.status(), 200, "default admin login failed");
        let body = response_json(response).await;
        body["access_token"]
            .as_str()
            .expect("access_token in login response")
            .to_string()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
