use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::errors::ServiceError;
use crate::models::machine::{Machine, MachineCreate, MachineUpdate};
use crate::models::part::{Part, PartCreate, PartUpdate};
use crate::models::subcategory::{Subcategory, SubcategoryCreate};
use crate::AppState;

pub async fn list_machines(
    State(state): State<AppState>,
) -> Result<Json<Vec<Machine>>, ServiceError> {
    state.catalog.list_machines().await.map(Json)
}

pub async fn list_subcategories(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
) -> Result<Json<Vec<Subcategory>>, ServiceError> {
    state
        .catalog
        .list_subcategories_by_machine(&machine_id)
        .await
        .map(Json)
}

pub async fn list_parts_by_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
) -> Result<Json<Vec<Part>>, ServiceError> {
    state
        .catalog
        .list_parts_by_machine(&machine_id)
        .await
        .map(Json)
}

pub async fn list_parts_by_subcategory(
    State(state): State<AppState>,
    Path(subcategory_id): Path<String>,
) -> Result<Json<Vec<Part>>, ServiceError> {
    state
        .catalog
        .list_parts_by_subcategory(&subcategory_id)
        .await
        .map(Json)
}

pub async fn list_all_subcategories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subcategory>>, ServiceError> {
    state.catalog.list_all_subcategories().await.map(Json)
}

pub async fn list_all_parts(State(state): State<AppState>) -> Result<Json<Vec<Part>>, ServiceError> {
    state.catalog.list_all_parts().await.map(Json)
}

pub async fn create_machine(
    State(state): State<AppState>,
    Json(input): Json<MachineCreate>,
) -> Result<Json<Machine>, ServiceError> {
    state.catalog.create_machine(input).await.map(Json)
}

pub async fn update_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
    Json(input): Json<MachineUpdate>,
) -> Result<Json<Machine>, ServiceError> {
    state.catalog.update_machine(&machine_id, input).await.map(Json)
}

pub async fn delete_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
) -> Result<Json<MessageResponse>, ServiceError> {
    state.catalog.delete_machine(&machine_id).await?;
    Ok(Json(MessageResponse::new("Machine deleted successfully")))
}

pub async fn create_subcategory(
    State(state): State<AppState>,
    Json(input): Json<SubcategoryCreate>,
) -> Result<Json<Subcategory>, ServiceError> {
    state.catalog.create_subcategory(input).await.map(Json)
}

pub async fn update_subcategory(
    State(state): State<AppState>,
    Path(subcategory_id): Path<String>,
    Json(input): Json<SubcategoryCreate>,
) -> Result<Json<Subcategory>, ServiceError> {
    state
        .catalog
        .update_subcategory(&subcategory_id, input)
        .await
        .map(Json)
}

pub async fn delete_subcategory(
    State(state): State<AppState>,
    Path(subcategory_id): Path<String>,
) -> Result<Json<MessageResponse>, ServiceError> {
    state.catalog.delete_subcategory(&subcategory_id).await?;
    Ok(Json(MessageResponse::new("Subcategory deleted successfully")))
}

pub async fn create_part(
    State(state): State<AppState>,
    Json(input): Json<PartCreate>,
) -> Result<Json<Part>, ServiceError> {
    state.catalog.create_part(input).await.map(Json)
}

pub async fn update_part(
    State(state): State<AppState>,
    Path(part_id): Path<String>,
    Json(input): Json<PartUpdate>,
) -> Result<Json<Part>, ServiceError> {
    state.catalog.update_part(&part_id, input).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct PriceUpdateResponse {
    pub message: String,
    pub new_price: f64,
}

/// Price arrives as a query parameter; no sign or magnitude checks.
pub async fn update_part_price(
    State(state): State<AppState>,
    Path(part_id): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceUpdateResponse>, ServiceError> {
    state.catalog.update_part_price(&part_id, query.price).await?;
    Ok(Json(PriceUpdateResponse {
        message: "Price updated successfully".to_string(),
        new_price: query.price,
    }))
}

pub async fn delete_part(
    State(state): State<AppState>,
    Path(part_id): Path<String>,
) -> Result<Json<MessageResponse>, ServiceError> {
    state.catalog.delete_part(&part_id).await?;
    Ok(Json(MessageResponse::new("Part deleted successfully")))
}

/// Seeds the default admin and demo catalog; safe to call repeatedly.
pub async fn init_sample_data(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ServiceError> {
    state.auth.ensure_default_admin().await?;
    let message = state.catalog.init_sample_data().await?;
    Ok(Json(MessageResponse::new(message)))
}
