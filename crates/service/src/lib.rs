//! Service layer providing business-oriented operations on top of models.
//! - Customers and sellers are plain CRUD plus two reporting queries.
//! - Sales go through the aggregate manager in [`sales`], which validates
//!   references and keeps totals derived.

pub mod errors;
pub mod customer_service;
pub mod seller_service;
pub mod sales;
#[cfg(test)]
pub mod test_support;
