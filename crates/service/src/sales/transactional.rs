use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};
use tracing::error;
use uuid::Uuid;

use super::domain::{Sale, SaleInput};
use super::repo::SeaOrmSalesRepository;
use super::service::SaleService;
use crate::errors::ServiceError;

type SeaOrmSaleService<'c, C> =
    SaleService<SeaOrmSalesRepository<'c, C>, SeaOrmSalesRepository<'c, C>, SeaOrmSalesRepository<'c, C>>;

fn service_on<C: ConnectionTrait>(conn: &C) -> SeaOrmSaleService<'_, C> {
    let repo = Arc::new(SeaOrmSalesRepository::new(conn));
    SaleService::new(repo.clone(), repo.clone(), repo)
}

/// Database-backed sale operations.
///
/// Create and update run their reference checks and the write inside one
/// repeatable-read transaction: it commits when the operation succeeds and
/// rolls back otherwise. Single-statement operations run on the pool.
#[derive(Clone)]
pub struct TransactionalSales {
    db: DatabaseConnection,
}

impl TransactionalSales {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        self.db
            .begin_with_config(Some(IsolationLevel::RepeatableRead), None)
            .await
            .map_err(ServiceError::db)
    }

    pub async fn create(&self, input: SaleInput) -> Result<Sale, ServiceError> {
        let txn = self.begin().await?;
        let out = service_on(&txn).create(input).await;
        finish(txn, out).await
    }

    pub async fn update(&self, id: Uuid, input: SaleInput) -> Result<Sale, ServiceError> {
        let txn = self.begin().await?;
        let out = service_on(&txn).update(id, input).await;
        finish(txn, out).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Sale>, ServiceError> {
        service_on(&self.db).get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Sale>, ServiceError> {
        service_on(&self.db).list().await
    }

    pub async fn above_threshold(&self, threshold: f64) -> Result<Vec<Sale>, ServiceError> {
        service_on(&self.db).above_threshold(threshold).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        service_on(&self.db).delete(id).await
    }

    /// One `UPDATE ... WHERE total_value IS NULL` statement.
    pub async fn zero_undefined_totals(&self) -> Result<u64, ServiceError> {
        service_on(&self.db).zero_undefined_totals().await
    }
}

async fn finish<T>(txn: DatabaseTransaction, out: Result<T, ServiceError>) -> Result<T, ServiceError> {
    match out {
        Ok(value) => {
            txn.commit().await.map_err(ServiceError::db)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                error!(error = %rb, "sale_rollback_failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_service::{create_customer, CustomerInput};
    use crate::errors::EntityKind;
    use crate::seller_service::{create_seller, SellerInput};
    use crate::test_support::get_db;

    async fn setup() -> (TransactionalSales, Uuid, Uuid) {
        let db = get_db().await.unwrap();
        let seller = create_seller(
            &db,
            &SellerInput { name: "Ana".into(), email: "ana@example.com".into(), tax_id: None, salary: Some(3000.0) },
        )
        .await
        .unwrap();
        let customer = create_customer(
            &db,
            &CustomerInput { name: "Bruno".into(), email: "bruno@example.com".into(), tax_id: None, address: None },
        )
        .await
        .unwrap();
        (TransactionalSales::new(db), seller.id, customer.id)
    }

    fn input(seller_id: Uuid, customer_id: Uuid, price: Option<f64>, quantity: Option<i32>) -> SaleInput {
        SaleInput {
            seller_id,
            customer_id,
            product_id: Some(42),
            product_name: Some("Notebook".into()),
            product_price: price,
            product_quantity: quantity,
        }
    }

    #[tokio::test]
    async fn create_and_read_back() {
        let (sales, seller_id, customer_id) = setup().await;
        let sale = sales.create(input(seller_id, customer_id, Some(10.0), Some(3))).await.unwrap();
        assert_eq!(sale.total_value(), Some(30.0));

        let loaded = sales.get(sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_value(), Some(30.0));
        assert_eq!(loaded.line.product_id, Some(42));
        assert_eq!(sales.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_reference_commits_nothing() {
        let (sales, seller_id, _) = setup().await;
        let err = sales.create(input(seller_id, Uuid::new_v4(), Some(1.0), Some(1))).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Customer)));
        assert!(sales.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_recomputes_and_failed_update_keeps_row() {
        let (sales, seller_id, customer_id) = setup().await;
        let sale = sales.create(input(seller_id, customer_id, None, Some(2))).await.unwrap();
        assert_eq!(sale.total_value(), None);

        let updated = sales.update(sale.id, input(seller_id, customer_id, Some(2.5), Some(2))).await.unwrap();
        assert_eq!(updated.total_value(), Some(5.0));

        let err = sales.update(sale.id, input(Uuid::new_v4(), customer_id, Some(9.0), Some(9))).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Seller)));
        assert_eq!(sales.get(sale.id).await.unwrap().unwrap().total_value(), Some(5.0));

        let err = sales.update(Uuid::new_v4(), input(seller_id, customer_id, None, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(EntityKind::Sale)));
    }

    #[tokio::test]
    async fn bulk_zero_and_threshold() {
        let (sales, seller_id, customer_id) = setup().await;
        let a = sales.create(input(seller_id, customer_id, None, Some(1))).await.unwrap();
        let b = sales.create(input(seller_id, customer_id, Some(5.0), Some(1))).await.unwrap();
        let c = sales.create(input(seller_id, customer_id, Some(20.0), Some(1))).await.unwrap();

        assert_eq!(sales.zero_undefined_totals().await.unwrap(), 1);
        assert_eq!(sales.get(a.id).await.unwrap().unwrap().total_value(), Some(0.0));
        assert_eq!(sales.get(b.id).await.unwrap().unwrap().total_value(), Some(5.0));
        assert_eq!(sales.zero_undefined_totals().await.unwrap(), 0);

        let above: Vec<Uuid> = sales.above_threshold(10.0).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(above, vec![c.id]);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (sales, seller_id, customer_id) = setup().await;
        let sale = sales.create(input(seller_id, customer_id, Some(1.0), Some(1))).await.unwrap();
        sales.delete(sale.id).await.unwrap();
        assert!(sales.get(sale.id).await.unwrap().is_none());
        assert!(matches!(sales.delete(sale.id).await, Err(ServiceError::NotFound(EntityKind::Sale))));
    }
}
