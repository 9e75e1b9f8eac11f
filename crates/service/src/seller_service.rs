use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use common::pagination::Pagination;
use models::seller;
use crate::errors::{EntityKind, ServiceError};

/// Fields accepted when creating or replacing a seller.
#[derive(Debug, Clone, Deserialize)]
pub struct SellerInput {
    pub name: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub salary: Option<f64>,
}

/// Create a seller.
pub async fn create_seller(db: &DatabaseConnection, input: &SellerInput) -> Result<seller::Model, ServiceError> {
    let created = seller::create(db, &input.name, &input.email, input.tax_id.as_deref(), input.salary).await?;
    Ok(created)
}

/// Get a seller by id.
pub async fn get_seller(db: &DatabaseConnection, id: Uuid) -> Result<Option<seller::Model>, ServiceError> {
    seller::Entity::find_by_id(id).one(db).await.map_err(ServiceError::db)
}

/// List sellers in creation order, optionally one page at a time.
pub async fn list_sellers(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<seller::Model>, ServiceError> {
    use sea_orm::PaginatorTrait;
    let select = seller::Entity::find().order_by_asc(seller::Column::CreatedAt);
    let rows = match page {
        Some(p) => {
            let (page_idx, per_page) = p.normalize();
            select.paginate(db, per_page).fetch_page(page_idx).await
        }
        None => select.all(db).await,
    };
    rows.map_err(ServiceError::db)
}

/// Replace every attribute of a seller.
pub async fn update_seller(db: &DatabaseConnection, id: Uuid, input: &SellerInput) -> Result<seller::Model, ServiceError> {
    seller::validate_name(&input.name)?;
    seller::validate_email(&input.email)?;
    seller::validate_salary(input.salary)?;
    let mut am: seller::ActiveModel = seller::Entity::find_by_id(id)
        .one(db).await.map_err(ServiceError::db)?
        .ok_or_else(|| ServiceError::not_found(EntityKind::Seller))?
        .into();
    am.name = Set(input.name.clone());
    am.email = Set(input.email.clone());
    am.tax_id = Set(input.tax_id.clone());
    am.salary = Set(input.salary);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(ServiceError::db)?;
    Ok(updated)
}

/// Hard delete a seller. Sales pointing at it are left as they are.
pub async fn delete_seller(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = seller::Entity::delete_by_id(id).exec(db).await.map_err(ServiceError::db)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found(EntityKind::Seller));
    }
    Ok(())
}

/// Known salaries, highest first. Sellers without a salary are skipped.
pub async fn salaries_desc(db: &DatabaseConnection) -> Result<Vec<f64>, ServiceError> {
    use sea_orm::{ColumnTrait, QueryFilter, QuerySelect};
    let rows: Vec<Option<f64>> = seller::Entity::find()
        .select_only()
        .column(seller::Column::Salary)
        .filter(seller::Column::Salary.is_not_null())
        .order_by_desc(seller::Column::Salary)
        .into_tuple()
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(rows.into_iter().flatten().collect())
}
