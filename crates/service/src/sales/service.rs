use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{NewSale, Sale, SaleInput};
use super::repository::{CustomerLookup, SaleStore, SellerLookup};
use crate::errors::{EntityKind, ServiceError};

/// Sale aggregate manager, independent of web framework and storage backend.
pub struct SaleService<S: SaleStore, L: SellerLookup, C: CustomerLookup> {
    sales: Arc<S>,
    sellers: Arc<L>,
    customers: Arc<C>,
}

impl<S: SaleStore, L: SellerLookup, C: CustomerLookup> SaleService<S, L, C> {
    pub fn new(sales: Arc<S>, sellers: Arc<L>, customers: Arc<C>) -> Self { Self { sales, sellers, customers } }

    /// Seller first, then customer. The customer is not looked up when the seller is missing.
    async fn check_references(&self, seller_id: Uuid, customer_id: Uuid) -> Result<(), ServiceError> {
        if self.sellers.find_seller(seller_id).await?.is_none() {
            warn!(%seller_id, "sale_seller_missing");
            return Err(ServiceError::ReferenceNotFound(EntityKind::Seller));
        }
        if self.customers.find_customer(customer_id).await?.is_none() {
            warn!(%customer_id, "sale_customer_missing");
            return Err(ServiceError::ReferenceNotFound(EntityKind::Customer));
        }
        Ok(())
    }

    /// Store a new sale after both references check out.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::sales::SaleService;
    /// use service::sales::domain::SaleInput;
    /// use service::sales::repository::memory::{MemoryCustomerLookup, MemorySaleStore, MemorySellerLookup};
    /// let sellers = Arc::new(MemorySellerLookup::default());
    /// let customers = Arc::new(MemoryCustomerLookup::default());
    /// let input = SaleInput {
    ///     seller_id: sellers.add("Ana"),
    ///     customer_id: customers.add("Bruno"),
    ///     product_id: Some(7),
    ///     product_name: Some("Notebook".into()),
    ///     product_price: Some(10.0),
    ///     product_quantity: Some(3),
    /// };
    /// let svc = SaleService::new(Arc::new(MemorySaleStore::default()), sellers, customers);
    /// let sale = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(sale.total_value(), Some(30.0));
    /// ```
    #[instrument(skip(self, input), fields(seller_id = %input.seller_id, customer_id = %input.customer_id))]
    pub async fn create(&self, input: SaleInput) -> Result<Sale, ServiceError> {
        self.check_references(input.seller_id, input.customer_id).await?;
        let sale = self.sales.insert(NewSale::from(input)).await?;
        info!(sale_id = %sale.id, total_value = ?sale.total_value(), "sale_created");
        Ok(sale)
    }

    /// Replace every field of an existing sale.
    ///
    /// Checks run in order: the sale exists, then the seller, then the customer.
    /// Nothing is written unless all three pass.
    #[instrument(skip(self, input), fields(sale_id = %id, seller_id = %input.seller_id, customer_id = %input.customer_id))]
    pub async fn update(&self, id: Uuid, input: SaleInput) -> Result<Sale, ServiceError> {
        let mut sale = self
            .sales
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(EntityKind::Sale))?;
        self.check_references(input.seller_id, input.customer_id).await?;
        sale.apply(input);
        let sale = self.sales.save(sale).await?;
        info!(total_value = ?sale.total_value(), "sale_updated");
        Ok(sale)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Sale>, ServiceError> {
        self.sales.find_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Sale>, ServiceError> {
        self.sales.find_all().await
    }

    /// Sales whose total is strictly greater than `threshold`. Undefined totals never match.
    #[instrument(skip(self))]
    pub async fn above_threshold(&self, threshold: f64) -> Result<Vec<Sale>, ServiceError> {
        if !threshold.is_finite() {
            return Err(ServiceError::Validation("threshold must be a finite number".into()));
        }
        let sales = self.sales.find_total_above(threshold).await?;
        debug!(matched = sales.len(), "sales_above_threshold");
        Ok(sales)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.sales.delete_by_id(id).await? {
            return Err(ServiceError::not_found(EntityKind::Sale));
        }
        info!(sale_id = %id, "sale_deleted");
        Ok(())
    }

    /// Set every undefined total to 0.0; defined totals are left alone.
    ///
    /// Returns the number of sales changed. A second run right after returns 0.
    #[instrument(skip(self))]
    pub async fn zero_undefined_totals(&self) -> Result<u64, ServiceError> {
        let updated = self.sales.zero_undefined_totals().await?;
        info!(updated, "sale_totals_zeroed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::repository::memory::{MemoryCustomerLookup, MemorySaleStore, MemorySellerLookup};

    struct Fixture {
        store: Arc<MemorySaleStore>,
        sellers: Arc<MemorySellerLookup>,
        customers: Arc<MemoryCustomerLookup>,
        seller_id: Uuid,
        customer_id: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            let sellers = Arc::new(MemorySellerLookup::default());
            let customers = Arc::new(MemoryCustomerLookup::default());
            let seller_id = sellers.add("Ana");
            let customer_id = customers.add("Bruno");
            Self { store: Arc::new(MemorySaleStore::default()), sellers, customers, seller_id, customer_id }
        }

        fn svc(&self) -> SaleService<MemorySaleStore, MemorySellerLookup, MemoryCustomerLookup> {
            SaleService::new(self.store.clone(), self.sellers.clone(), self.customers.clone())
        }

        fn input(&self, price: Option<f64>, quantity: Option<i32>) -> SaleInput {
            SaleInput {
                seller_id: self.seller_id,
                customer_id: self.customer_id,
                product_id: Some(1),
                product_name: Some("Notebook".into()),
                product_price: price,
                product_quantity: quantity,
            }
        }
    }

    #[tokio::test]
    async fn create_computes_total() {
        let fx = Fixture::new();
        let sale = fx.svc().create(fx.input(Some(10.0), Some(3))).await.unwrap();
        assert_eq!(sale.total_value(), Some(30.0));
        assert_eq!(fx.store.snapshot(), vec![sale]);
    }

    #[tokio::test]
    async fn create_without_price_leaves_total_undefined() {
        let fx = Fixture::new();
        let sale = fx.svc().create(fx.input(None, Some(3))).await.unwrap();
        assert_eq!(sale.total_value(), None);
        let sale = fx.svc().create(fx.input(Some(4.0), None)).await.unwrap();
        assert_eq!(sale.total_value(), None);
    }

    #[tokio::test]
    async fn create_with_unknown_seller_skips_customer_and_store() {
        let fx = Fixture::new();
        let mut input = fx.input(Some(1.0), Some(1));
        input.seller_id = Uuid::new_v4();
        let err = fx.svc().create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Seller)));
        assert_eq!(fx.sellers.lookups(), 1);
        assert_eq!(fx.customers.lookups(), 0);
        assert_eq!(fx.store.writes(), 0);
    }

    #[tokio::test]
    async fn seller_error_wins_when_both_references_are_missing() {
        let fx = Fixture::new();
        let mut input = fx.input(Some(1.0), Some(1));
        input.seller_id = Uuid::new_v4();
        input.customer_id = Uuid::new_v4();
        let err = fx.svc().create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Seller)));
    }

    #[tokio::test]
    async fn create_with_unknown_customer_writes_nothing() {
        let fx = Fixture::new();
        let mut input = fx.input(Some(1.0), Some(1));
        input.customer_id = Uuid::new_v4();
        let err = fx.svc().create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Customer)));
        assert_eq!(fx.sellers.lookups(), 1);
        assert_eq!(fx.customers.lookups(), 1);
        assert_eq!(fx.store.writes(), 0);
        assert!(fx.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields_and_recomputes_total() {
        let fx = Fixture::new();
        let svc = fx.svc();
        let sale = svc.create(fx.input(None, Some(2))).await.unwrap();
        let other_seller = fx.sellers.add("Carla");
        let mut input = fx.input(Some(5.0), Some(4));
        input.seller_id = other_seller;
        input.product_name = Some("Pen".into());

        let updated = svc.update(sale.id, input).await.unwrap();
        assert_eq!(updated.id, sale.id);
        assert_eq!(updated.seller_id, other_seller);
        assert_eq!(updated.line.product_name.as_deref(), Some("Pen"));
        assert_eq!(updated.total_value(), Some(20.0));
        assert_eq!(svc.get(sale.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_of_missing_sale_checks_nothing_else() {
        let fx = Fixture::new();
        let err = fx.svc().update(Uuid::new_v4(), fx.input(Some(1.0), Some(1))).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(EntityKind::Sale)));
        assert_eq!(fx.store.reads(), 1);
        assert_eq!(fx.sellers.lookups(), 0);
        assert_eq!(fx.customers.lookups(), 0);
        assert_eq!(fx.store.writes(), 0);
    }

    #[tokio::test]
    async fn update_with_unknown_seller_keeps_stored_sale() {
        let fx = Fixture::new();
        let svc = fx.svc();
        let sale = svc.create(fx.input(Some(2.0), Some(2))).await.unwrap();
        let writes = fx.store.writes();
        let customer_lookups = fx.customers.lookups();

        let mut input = fx.input(Some(9.0), Some(9));
        input.seller_id = Uuid::new_v4();
        let err = svc.update(sale.id, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Seller)));
        assert_eq!(fx.customers.lookups(), customer_lookups);
        assert_eq!(fx.store.writes(), writes);
        assert_eq!(svc.get(sale.id).await.unwrap(), Some(sale));
    }

    #[tokio::test]
    async fn update_with_unknown_customer_keeps_stored_sale() {
        let fx = Fixture::new();
        let svc = fx.svc();
        let sale = svc.create(fx.input(Some(2.0), Some(2))).await.unwrap();
        let writes = fx.store.writes();

        let mut input = fx.input(Some(9.0), Some(9));
        input.customer_id = Uuid::new_v4();
        let err = svc.update(sale.id, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferenceNotFound(EntityKind::Customer)));
        assert_eq!(fx.store.writes(), writes);
        assert_eq!(svc.get(sale.id).await.unwrap(), Some(sale));
    }

    #[tokio::test]
    async fn store_failure_is_propagated() {
        let fx = Fixture::new();
        fx.store.set_fail_writes(true);
        let err = fx.svc().create(fx.input(Some(1.0), Some(1))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert!(fx.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn zero_undefined_totals_only_touches_undefined() {
        let fx = Fixture::new();
        let svc = fx.svc();
        let a = svc.create(fx.input(None, Some(1))).await.unwrap();
        let b = svc.create(fx.input(Some(5.0), Some(1))).await.unwrap();
        let c = svc.create(fx.input(Some(3.0), None)).await.unwrap();

        assert_eq!(svc.zero_undefined_totals().await.unwrap(), 2);
        assert_eq!(svc.get(a.id).await.unwrap().unwrap().total_value(), Some(0.0));
        assert_eq!(svc.get(b.id).await.unwrap().unwrap().total_value(), Some(5.0));
        assert_eq!(svc.get(c.id).await.unwrap().unwrap().total_value(), Some(0.0));

        assert_eq!(svc.zero_undefined_totals().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zero_undefined_totals_on_empty_store() {
        let fx = Fixture::new();
        assert_eq!(fx.svc().zero_undefined_totals().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn above_threshold_is_strict_and_skips_undefined() {
        let fx = Fixture::new();
        let svc = fx.svc();
        svc.create(fx.input(Some(10.0), Some(1))).await.unwrap();
        let big = svc.create(fx.input(Some(10.0), Some(2))).await.unwrap();
        svc.create(fx.input(None, Some(100))).await.unwrap();

        let found = svc.above_threshold(10.0).await.unwrap();
        assert_eq!(found, vec![big]);
        assert!(svc.above_threshold(f64::NAN).await.is_err());
    }

    #[tokio::test]
    async fn delete_missing_sale_is_not_found() {
        let fx = Fixture::new();
        let svc = fx.svc();
        let sale = svc.create(fx.input(Some(1.0), Some(1))).await.unwrap();
        svc.delete(sale.id).await.unwrap();
        assert!(svc.get(sale.id).await.unwrap().is_none());
        let err = svc.delete(sale.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(EntityKind::Sale)));
    }
}
