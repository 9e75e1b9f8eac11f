use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder, Set, Unchanged,
};
use uuid::Uuid;

use models::{customer, sale, seller};

use crate::errors::{EntityKind, ServiceError};
use crate::sales::domain::{NewSale, ProductLine, Sale};
use crate::sales::repository::{CustomerLookup, SaleStore, SellerLookup};

/// SeaORM-backed sale store and reference lookups.
///
/// Borrows its connection, so the same type runs on the pool or inside a
/// `DatabaseTransaction`.
pub struct SeaOrmSalesRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmSalesRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self { Self { conn } }
}

impl From<sale::Model> for Sale {
    fn from(m: sale::Model) -> Self {
        Sale {
            id: m.id,
            seller_id: m.seller_id,
            customer_id: m.customer_id,
            line: ProductLine::restore(m.product_id, m.product_name, m.product_price, m.product_quantity, m.total_value),
        }
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> SellerLookup for SeaOrmSalesRepository<'c, C> {
    async fn find_seller(&self, id: Uuid) -> Result<Option<seller::Model>, ServiceError> {
        seller::Entity::find_by_id(id).one(self.conn).await.map_err(ServiceError::db)
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> CustomerLookup for SeaOrmSalesRepository<'c, C> {
    async fn find_customer(&self, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
        customer::Entity::find_by_id(id).one(self.conn).await.map_err(ServiceError::db)
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> SaleStore for SeaOrmSalesRepository<'c, C> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, ServiceError> {
        let found = sale::Entity::find_by_id(id).one(self.conn).await.map_err(ServiceError::db)?;
        Ok(found.map(Sale::from))
    }

    async fn insert(&self, new: NewSale) -> Result<Sale, ServiceError> {
        let now = Utc::now().into();
        let am = sale::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(new.seller_id),
            customer_id: Set(new.customer_id),
            product_id: Set(new.line.product_id),
            product_name: Set(new.line.product_name.clone()),
            product_price: Set(new.line.product_price()),
            product_quantity: Set(new.line.product_quantity()),
            total_value: Set(new.line.total_value()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let stored = am.insert(self.conn).await.map_err(ServiceError::db)?;
        Ok(stored.into())
    }

    async fn save(&self, s: Sale) -> Result<Sale, ServiceError> {
        let am = sale::ActiveModel {
            id: Unchanged(s.id),
            seller_id: Set(s.seller_id),
            customer_id: Set(s.customer_id),
            product_id: Set(s.line.product_id),
            product_name: Set(s.line.product_name.clone()),
            product_price: Set(s.line.product_price()),
            product_quantity: Set(s.line.product_quantity()),
            total_value: Set(s.line.total_value()),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        };
        match am.update(self.conn).await {
            Ok(stored) => Ok(stored.into()),
            Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found(EntityKind::Sale)),
            Err(e) => Err(ServiceError::db(e)),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = sale::Entity::delete_by_id(id).exec(self.conn).await.map_err(ServiceError::db)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_all(&self) -> Result<Vec<Sale>, ServiceError> {
        let rows = sale::Entity::find()
            .order_by_asc(sale::Column::CreatedAt)
            .all(self.conn)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn find_total_above(&self, threshold: f64) -> Result<Vec<Sale>, ServiceError> {
        let rows = sale::Entity::find()
            .filter(sale::Column::TotalValue.gt(threshold))
            .order_by_asc(sale::Column::CreatedAt)
            .all(self.conn)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn zero_undefined_totals(&self) -> Result<u64, ServiceError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let res = sale::Entity::update_many()
            .col_expr(sale::Column::TotalValue, Expr::value(0.0_f64))
            .col_expr(sale::Column::UpdatedAt, Expr::value(now))
            .filter(sale::Column::TotalValue.is_null())
            .exec(self.conn)
            .await
            .map_err(ServiceError::db)?;
        Ok(res.rows_affected)
    }
}
