use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::UpdatedResponse;
use service::errors::{EntityKind, ServiceError};
use service::sales::domain::{Sale, SaleInput};

use crate::errors::JsonApiError;
use crate::routes::{non_empty, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ThresholdQuery {
    /// Defaults to the configured `sales.default_threshold`.
    pub threshold: Option<f64>,
}

#[utoipa::path(
    get, path = "/sales", tag = "sales",
    responses((status = 200, description = "Sales"), (status = 404, description = "No sales"))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Sale>>, JsonApiError> {
    non_empty(state.sales.list().await?, "sales")
}

/// A reference that does not resolve is a bad request on create.
#[utoipa::path(
    post, path = "/sales", tag = "sales",
    request_body = crate::openapi::SaleInputDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Unknown seller or customer"))
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<SaleInput>) -> Result<(StatusCode, Json<Sale>), JsonApiError> {
    match state.sales.create(input).await {
        Ok(sale) => Ok((StatusCode::CREATED, Json(sale))),
        Err(e @ ServiceError::ReferenceNotFound(_)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Reference", Some(e.to_string())))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get, path = "/sales/{id}", tag = "sales",
    params(("id" = Uuid, Path, description = "Sale ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Sale>, JsonApiError> {
    state
        .sales
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::not_found(EntityKind::Sale).into())
}

#[utoipa::path(
    put, path = "/sales/{id}", tag = "sales",
    params(("id" = Uuid, Path, description = "Sale ID")),
    request_body = crate::openapi::SaleInputDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Sale, seller or customer not found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SaleInput>,
) -> Result<Json<Sale>, JsonApiError> {
    Ok(Json(state.sales.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/sales/{id}", tag = "sales",
    params(("id" = Uuid, Path, description = "Sale ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.sales.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/sales/above-threshold", tag = "sales",
    params(ThresholdQuery),
    responses((status = 200, description = "Sales above the threshold"), (status = 404, description = "No sales above the threshold"))
)]
pub async fn above_threshold(State(state): State<ServerState>, Query(q): Query<ThresholdQuery>) -> Result<Json<Vec<Sale>>, JsonApiError> {
    let threshold = q.threshold.unwrap_or(state.default_threshold);
    non_empty(state.sales.above_threshold(threshold).await?, "sales above threshold")
}

#[utoipa::path(
    put, path = "/sales/zero-undefined-totals", tag = "sales",
    responses((status = 200, description = "Number of corrected sales", body = crate::openapi::UpdatedResponseDoc))
)]
pub async fn zero_undefined_totals(State(state): State<ServerState>) -> Result<Json<UpdatedResponse>, JsonApiError> {
    let updated = state.sales.zero_undefined_totals().await?;
    info!(updated, "sale_totals_zeroed_via_http");
    Ok(Json(UpdatedResponse { updated }))
}
