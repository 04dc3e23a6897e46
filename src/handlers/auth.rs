use axum::extract::State;
use axum::Json;

use crate::auth::{AuthError, TokenResponse};
use crate::errors::ServiceError;
use crate::models::admin::{Admin, AdminCreate, AdminLogin};
use crate::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<AdminLogin>,
) -> Result<Json<TokenResponse>, AuthError> {
    state.auth.login(credentials).await.map(Json)
}

/// Open by design; duplicate usernames are the only rejection.
pub async fn create_admin(
    State(state): State<AppState>,
    Json(input): Json<AdminCreate>,
) -> Result<Json<Admin>, ServiceError> {
    state.auth.create_admin(input).await.map(Json)
}
