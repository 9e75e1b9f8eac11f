use axum::Json;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CustomerInputDoc {
    pub name: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

#[derive(ToSchema)]
pub struct SellerInputDoc {
    pub name: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub salary: Option<f64>,
}

/// `total_value` is derived and never accepted from clients.
#[derive(ToSchema)]
pub struct SaleInputDoc {
    pub seller_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
    pub product_quantity: Option<i32>,
}

#[derive(ToSchema)]
pub struct EmailQueryDoc { pub email: String }

#[derive(ToSchema)]
pub struct CountResponseDoc { pub query: String, pub count: u64 }

#[derive(ToSchema)]
pub struct UpdatedResponseDoc { pub updated: u64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list,
        crate::routes::customers::create,
        crate::routes::customers::get,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::customers::count_by_email,
        crate::routes::sellers::list,
        crate::routes::sellers::create,
        crate::routes::sellers::get,
        crate::routes::sellers::update,
        crate::routes::sellers::delete,
        crate::routes::sellers::salaries,
        crate::routes::sales::list,
        crate::routes::sales::create,
        crate::routes::sales::get,
        crate::routes::sales::update,
        crate::routes::sales::delete,
        crate::routes::sales::above_threshold,
        crate::routes::sales::zero_undefined_totals,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerInputDoc,
            SellerInputDoc,
            SaleInputDoc,
            EmailQueryDoc,
            CountResponseDoc,
            UpdatedResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers"),
        (name = "sellers"),
        (name = "sales")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
