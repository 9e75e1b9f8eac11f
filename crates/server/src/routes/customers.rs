use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::CountResponse;
use models::customer;
use service::customer_service::{self, CustomerInput};
use service::errors::{EntityKind, ServiceError};

use crate::errors::JsonApiError;
use crate::routes::{non_empty, ListQuery, ServerState};

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[utoipa::path(
    get, path = "/customers", tag = "customers",
    params(ListQuery),
    responses((status = 200, description = "Customers"), (status = 404, description = "No customers"))
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<customer::Model>>, JsonApiError> {
    let rows = customer_service::list_customers(&state.db, q.pagination()).await?;
    non_empty(rows, "customers")
}

#[utoipa::path(
    post, path = "/customers", tag = "customers",
    request_body = crate::openapi::CustomerInputDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"))
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<CustomerInput>) -> Result<(StatusCode, Json<customer::Model>), JsonApiError> {
    let created = customer_service::create_customer(&state.db, &input).await?;
    info!(customer_id = %created.id, "customer_created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<customer::Model>, JsonApiError> {
    customer_service::get_customer(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::not_found(EntityKind::Customer).into())
}

#[utoipa::path(
    put, path = "/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = crate::openapi::CustomerInputDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<customer::Model>, JsonApiError> {
    let updated = customer_service::update_customer(&state.db, id, &input).await?;
    info!(customer_id = %id, "customer_updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    customer_service::delete_customer(&state.db, id).await?;
    info!(customer_id = %id, "customer_deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/customers/count-by-email", tag = "customers",
    request_body = crate::openapi::EmailQueryDoc,
    responses((status = 200, description = "Count", body = crate::openapi::CountResponseDoc), (status = 404, description = "No match"))
)]
pub async fn count_by_email(State(state): State<ServerState>, Json(q): Json<EmailQuery>) -> Result<Json<CountResponse>, JsonApiError> {
    let count = customer_service::count_by_email_containing(&state.db, &q.email).await?;
    if count == 0 {
        return Err(JsonApiError::not_found(format!("no customer email contains '{}'", q.email)));
    }
    Ok(Json(CountResponse { query: q.email, count }))
}
