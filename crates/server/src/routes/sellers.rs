use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use models::seller;
use service::errors::{EntityKind, ServiceError};
use service::seller_service::{self, SellerInput};

use crate::errors::JsonApiError;
use crate::routes::{non_empty, ListQuery, ServerState};

#[utoipa::path(
    get, path = "/sellers", tag = "sellers",
    params(ListQuery),
    responses((status = 200, description = "Sellers"), (status = 404, description = "No sellers"))
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<seller::Model>>, JsonApiError> {
    let rows = seller_service::list_sellers(&state.db, q.pagination()).await?;
    non_empty(rows, "sellers")
}

#[utoipa::path(
    post, path = "/sellers", tag = "sellers",
    request_body = crate::openapi::SellerInputDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<SellerInput>) -> Result<(StatusCode, Json<seller::Model>), JsonApiError> {
    let created = seller_service::create_seller(&state.db, &input).await?;
    info!(seller_id = %created.id, "seller_created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/sellers/{id}", tag = "sellers",
    params(("id" = Uuid, Path, description = "Seller ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<seller::Model>, JsonApiError> {
    seller_service::get_seller(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::not_found(EntityKind::Seller).into())
}

#[utoipa::path(
    put, path = "/sellers/{id}", tag = "sellers",
    params(("id" = Uuid, Path, description = "Seller ID")),
    request_body = crate::openapi::SellerInputDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SellerInput>,
) -> Result<Json<seller::Model>, JsonApiError> {
    let updated = seller_service::update_seller(&state.db, id, &input).await?;
    info!(seller_id = %id, "seller_updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/sellers/{id}", tag = "sellers",
    params(("id" = Uuid, Path, description = "Seller ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    seller_service::delete_seller(&state.db, id).await?;
    info!(seller_id = %id, "seller_deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/sellers/salaries", tag = "sellers",
    responses((status = 200, description = "Salaries, highest first"), (status = 404, description = "No salaries"))
)]
pub async fn salaries(State(state): State<ServerState>) -> Result<Json<Vec<f64>>, JsonApiError> {
    let salaries = seller_service::salaries_desc(&state.db).await?;
    non_empty(salaries, "salaries")
}
