pub mod errors;
pub mod db;
pub mod customer;
pub mod seller;
pub mod sale;

#[cfg(test)]
mod tests;
