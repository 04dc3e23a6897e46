//! HTTP surface: route assembly and the handlers mapping requests onto the
//! catalog, order, and auth services.

use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::{auth_middleware, AuthService};
use crate::AppState;

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod uploads;

/// Simple acknowledgement body used by delete and bootstrap endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "QuickParts API is running",
        "environment": state.config.environment,
    }))
}

/// Everything mounted under `/api`.
pub fn api_routes(auth_service: Arc<AuthService>) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/admin/orders", get(orders::list_orders))
        .route("/subcategories", get(catalog::list_all_subcategories))
        .route("/parts", get(catalog::list_all_parts))
        .route("/admin/machines", post(catalog::create_machine))
        .route(
            "/admin/machines/:machine_id",
            put(catalog::update_machine).delete(catalog::delete_machine),
        )
        .route("/admin/subcategories", post(catalog::create_subcategory))
        .route(
            "/admin/subcategories/:subcategory_id",
            put(catalog::update_subcategory).delete(catalog::delete_subcategory),
        )
        .route("/admin/parts", post(catalog::create_part))
        .route(
            "/admin/parts/:part_id",
            put(catalog::update_part).delete(catalog::delete_part),
        )
        .route("/admin/parts/:part_id/price", put(catalog::update_part_price))
        .route("/admin/upload-image", post(uploads::upload_image))
        .layer(middleware::from_fn_with_state(
            auth_service,
            auth_middleware,
        ));

    Router::new()
        .route("/machines", get(catalog::list_machines))
        .route(
            "/machines/:machine_id/subcategories",
            get(catalog::list_subcategories),
        )
        .route(
            "/machines/:machine_id/parts",
            get(catalog::list_parts_by_machine),
        )
        .route(
            "/subcategories/:subcategory_id/parts",
            get(catalog::list_parts_by_subcategory),
        )
        .route("/orders", post(orders::create_order))
        .route("/admin/login", post(auth::login))
        .route("/admin/create", post(auth::create_admin))
        // Open bootstrap endpoint; idempotency is its only guard.
        .route("/admin/init-sample-data", post(catalog::init_sample_data))
        .route("/uploads/:filename", get(uploads::serve_upload))
        .merge(admin_routes)
}
