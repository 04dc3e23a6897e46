use axum::extract::State;
use axum::{Extension, Json};
use tracing::debug;

use crate::errors::ServiceError;
use crate::models::admin::Admin;
use crate::models::order::{Order, OrderCreate};
use crate::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<OrderCreate>,
) -> Result<Json<Order>, ServiceError> {
    state.orders.create_order(input).await.map(Json)
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
) -> Result<Json<Vec<Order>>, ServiceError> {
    debug!(admin = %admin.username, "listing all orders");
    state.orders.list_orders().await.map(Json)
}
