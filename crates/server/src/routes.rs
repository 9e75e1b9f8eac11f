use axum::{
    routing::{get, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{pagination::Pagination, types::Health};
use service::sales::TransactionalSales;

use crate::errors::JsonApiError;

pub mod customers;
pub mod sales;
pub mod sellers;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub sales: TransactionalSales,
    /// Used by `/sales/above-threshold` when the query string has no threshold.
    pub default_threshold: f64,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, default_threshold: f64) -> Self {
        Self { sales: TransactionalSales::new(db.clone()), db, default_threshold }
    }
}

/// Optional `?page=&per_page=` on list endpoints.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub fn pagination(&self) -> Option<Pagination> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        let d = Pagination::default();
        Some(Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) })
    }
}

/// Collection endpoints answer 404 instead of an empty array.
pub(crate) fn non_empty<T>(items: Vec<T>, what: &str) -> Result<Json<Vec<T>>, JsonApiError> {
    if items.is_empty() {
        return Err(JsonApiError::not_found(format!("no {what} found")));
    }
    Ok(Json(items))
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let customers = Router::new()
        .route("/customers", get(customers::list).post(customers::create))
        .route("/customers/count-by-email", axum::routing::post(customers::count_by_email))
        .route("/customers/:id", get(customers::get).put(customers::update).delete(customers::delete));

    let sellers = Router::new()
        .route("/sellers", get(sellers::list).post(sellers::create))
        .route("/sellers/salaries", get(sellers::salaries))
        .route("/sellers/:id", get(sellers::get).put(sellers::update).delete(sellers::delete));

    let sales = Router::new()
        .route("/sales", get(sales::list).post(sales::create))
        .route("/sales/above-threshold", get(sales::above_threshold))
        .route("/sales/zero-undefined-totals", put(sales::zero_undefined_totals))
        .route("/sales/:id", get(sales::get).put(sales::update).delete(sales::delete));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(crate::openapi::openapi_json))
        .merge(customers)
        .merge(sellers)
        .merge(sales)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
