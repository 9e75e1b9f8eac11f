//! Sales module: three-layer architecture (domain, repository, service).
//!
//! The manager validates seller/customer references before any write, keeps
//! `total_value` derived from price and quantity, and runs the bulk
//! correction of undefined totals.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;
pub mod transactional;

pub use service::SaleService;
pub use transactional::TransactionalSales;
