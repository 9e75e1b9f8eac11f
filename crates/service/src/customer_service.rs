use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use common::pagination::Pagination;
use models::customer;
use crate::errors::{EntityKind, ServiceError};

/// Fields accepted when creating or replacing a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

/// Create a customer.
pub async fn create_customer(db: &DatabaseConnection, input: &CustomerInput) -> Result<customer::Model, ServiceError> {
    let created = customer::create(db, &input.name, &input.email, input.tax_id.as_deref(), input.address.as_deref()).await?;
    Ok(created)
}

/// Get a customer by id.
pub async fn get_customer(db: &DatabaseConnection, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
    customer::Entity::find_by_id(id).one(db).await.map_err(ServiceError::db)
}

/// List customers in creation order, optionally one page at a time.
pub async fn list_customers(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<customer::Model>, ServiceError> {
    use sea_orm::PaginatorTrait;
    let select = customer::Entity::find().order_by_asc(customer::Column::CreatedAt);
    let rows = match page {
        Some(p) => {
            let (page_idx, per_page) = p.normalize();
            select.paginate(db, per_page).fetch_page(page_idx).await
        }
        None => select.all(db).await,
    };
    rows.map_err(ServiceError::db)
}

/// Replace every attribute of a customer.
pub async fn update_customer(db: &DatabaseConnection, id: Uuid, input: &CustomerInput) -> Result<customer::Model, ServiceError> {
    customer::validate_name(&input.name)?;
    customer::validate_email(&input.email)?;
    let mut am: customer::ActiveModel = customer::Entity::find_by_id(id)
        .one(db).await.map_err(ServiceError::db)?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Customer))?
        .into();
    am.name = Set(input.name.clone());
    am.email = Set(input.email.clone());
    am.tax_id = Set(input.tax_id.clone());
    am.address = Set(input.address.clone());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(ServiceError::db)?;
    Ok(updated)
}

/// Hard delete a customer. Sales pointing at it are left as they are.
pub async fn delete_customer(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = customer::Entity::delete_by_id(id).exec(db).await.map_err(ServiceError::db)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found(EntityKind::Customer));
    }
    Ok(())
}

/// Count customers whose email contains `needle`. An empty needle counts nothing.
pub async fn count_by_email_containing(db: &DatabaseConnection, needle: &str) -> Result<u64, ServiceError> {
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};
    if needle.is_empty() {
        return Ok(0);
    }
    customer::Entity::find()
        .filter(customer::Column::Email.contains(needle))
        .count(db)
        .await
        .map_err(ServiceError::db)
}
