use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewSale, Sale};
use crate::errors::ServiceError;

/// Existence check for the seller a sale points at.
#[async_trait]
pub trait SellerLookup: Send + Sync {
    async fn find_seller(&self, id: Uuid) -> Result<Option<models::seller::Model>, ServiceError>;
}

/// Existence check for the customer a sale points at.
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    async fn find_customer(&self, id: Uuid) -> Result<Option<models::customer::Model>, ServiceError>;
}

/// Persistence for sales.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, ServiceError>;
    /// Store a new sale under a freshly assigned id.
    async fn insert(&self, sale: NewSale) -> Result<Sale, ServiceError>;
    /// Overwrite every field of an existing sale.
    async fn save(&self, sale: Sale) -> Result<Sale, ServiceError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Sale>, ServiceError>;
    /// Sales whose total is defined and strictly greater than `threshold`.
    async fn find_total_above(&self, threshold: f64) -> Result<Vec<Sale>, ServiceError>;
    /// Set every undefined total to 0.0 in one step and return how many changed.
    async fn zero_undefined_totals(&self) -> Result<u64, ServiceError>;
}

/// In-memory stores for tests, doc examples and benches.
///
/// Every store counts the calls made against it so callers can assert which
/// collaborators an operation reached.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    fn guard<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, ServiceError> {
        m.lock().map_err(|_| ServiceError::Db("in-memory store poisoned".into()))
    }

    #[derive(Default)]
    pub struct MemorySellerLookup {
        sellers: Mutex<HashMap<Uuid, models::seller::Model>>,
        lookups: AtomicUsize,
    }

    impl MemorySellerLookup {
        /// Register a seller and return its id.
        pub fn add(&self, name: &str) -> Uuid {
            let now = Utc::now().into();
            let seller = models::seller::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                tax_id: None,
                salary: None,
                created_at: now,
                updated_at: now,
            };
            let id = seller.id;
            self.sellers.lock().unwrap_or_else(|p| p.into_inner()).insert(id, seller);
            id
        }

        pub fn lookups(&self) -> usize { self.lookups.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl SellerLookup for MemorySellerLookup {
        async fn find_seller(&self, id: Uuid) -> Result<Option<models::seller::Model>, ServiceError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(guard(&self.sellers)?.get(&id).cloned())
        }
    }

    #[derive(Default)]
    pub struct MemoryCustomerLookup {
        customers: Mutex<HashMap<Uuid, models::customer::Model>>,
        lookups: AtomicUsize,
    }

    impl MemoryCustomerLookup {
        /// Register a customer and return its id.
        pub fn add(&self, name: &str) -> Uuid {
            let now = Utc::now().into();
            let customer = models::customer::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                tax_id: None,
                address: None,
                created_at: now,
                updated_at: now,
            };
            let id = customer.id;
            self.customers.lock().unwrap_or_else(|p| p.into_inner()).insert(id, customer);
            id
        }

        pub fn lookups(&self) -> usize { self.lookups.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl CustomerLookup for MemoryCustomerLookup {
        async fn find_customer(&self, id: Uuid) -> Result<Option<models::customer::Model>, ServiceError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(guard(&self.customers)?.get(&id).cloned())
        }
    }

    /// Sales kept in insertion order.
    #[derive(Default)]
    pub struct MemorySaleStore {
        sales: Mutex<Vec<Sale>>,
        reads: AtomicUsize,
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MemorySaleStore {
        /// Calls to `find_by_id`.
        pub fn reads(&self) -> usize { self.reads.load(Ordering::SeqCst) }

        /// Calls to `insert`, `save`, `delete_by_id` and `zero_undefined_totals`.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        /// Make every later write fail with a database error.
        pub fn set_fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst); }

        pub fn snapshot(&self) -> Vec<Sale> {
            self.sales.lock().unwrap_or_else(|p| p.into_inner()).clone()
        }

        fn begin_write(&self) -> Result<(), ServiceError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("write rejected by store".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SaleStore for MemorySaleStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, ServiceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(guard(&self.sales)?.iter().find(|s| s.id == id).cloned())
        }

        async fn insert(&self, sale: NewSale) -> Result<Sale, ServiceError> {
            self.begin_write()?;
            let stored = Sale { id: Uuid::new_v4(), seller_id: sale.seller_id, customer_id: sale.customer_id, line: sale.line };
            guard(&self.sales)?.push(stored.clone());
            Ok(stored)
        }

        async fn save(&self, sale: Sale) -> Result<Sale, ServiceError> {
            self.begin_write()?;
            let mut sales = guard(&self.sales)?;
            let slot = sales
                .iter_mut()
                .find(|s| s.id == sale.id)
                .ok_or_else(|| ServiceError::not_found(crate::errors::EntityKind::Sale))?;
            *slot = sale.clone();
            Ok(sale)
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.begin_write()?;
            let mut sales = guard(&self.sales)?;
            let before = sales.len();
            sales.retain(|s| s.id != id);
            Ok(sales.len() != before)
        }

        async fn find_all(&self) -> Result<Vec<Sale>, ServiceError> {
            Ok(guard(&self.sales)?.clone())
        }

        async fn find_total_above(&self, threshold: f64) -> Result<Vec<Sale>, ServiceError> {
            Ok(guard(&self.sales)?
                .iter()
                .filter(|s| s.total_value().is_some_and(|t| t > threshold))
                .cloned()
                .collect())
        }

        async fn zero_undefined_totals(&self) -> Result<u64, ServiceError> {
            self.begin_write()?;
            let mut sales = guard(&self.sales)?;
            let changed = sales.iter_mut().map(|s| s.line.zero_undefined_total()).filter(|changed| *changed).count();
            Ok(changed as u64)
        }
    }
}
