use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::sale::compute_total;

/// Sale payload accepted on create and on full update.
///
/// There is no total here: a `total_value` sent by a client is dropped during
/// deserialization and the stored total is always derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleInput {
    pub seller_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
    pub product_quantity: Option<i32>,
}

/// Product fields of a sale, with `total_value` kept in step with price and quantity.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ProductLine {
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    product_price: Option<f64>,
    product_quantity: Option<i32>,
    total_value: Option<f64>,
}

impl ProductLine {
    pub fn new(
        product_id: Option<i64>,
        product_name: Option<String>,
        product_price: Option<f64>,
        product_quantity: Option<i32>,
    ) -> Self {
        let mut line = Self { product_id, product_name, product_price, product_quantity, total_value: None };
        line.recompute_total();
        line
    }

    /// Rebuild from persisted columns. The stored total is taken as-is, since
    /// the bulk correction may have set it to zero while price or quantity is unknown.
    pub fn restore(
        product_id: Option<i64>,
        product_name: Option<String>,
        product_price: Option<f64>,
        product_quantity: Option<i32>,
        total_value: Option<f64>,
    ) -> Self {
        Self { product_id, product_name, product_price, product_quantity, total_value }
    }

    pub fn product_price(&self) -> Option<f64> { self.product_price }

    pub fn product_quantity(&self) -> Option<i32> { self.product_quantity }

    pub fn total_value(&self) -> Option<f64> { self.total_value }

    pub fn set_product_price(&mut self, price: Option<f64>) {
        self.product_price = price;
        self.recompute_total();
    }

    pub fn set_product_quantity(&mut self, quantity: Option<i32>) {
        self.product_quantity = quantity;
        self.recompute_total();
    }

    pub fn recompute_total(&mut self) {
        self.total_value = compute_total(self.product_price, self.product_quantity);
    }

    /// Bulk correction for one record; returns whether the total changed.
    pub fn zero_undefined_total(&mut self) -> bool {
        if self.total_value.is_some() {
            return false;
        }
        self.total_value = Some(0.0);
        true
    }
}

/// Sale about to be stored for the first time. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub seller_id: Uuid,
    pub customer_id: Uuid,
    pub line: ProductLine,
}

impl From<SaleInput> for NewSale {
    fn from(input: SaleInput) -> Self {
        Self {
            seller_id: input.seller_id,
            customer_id: input.customer_id,
            line: ProductLine::new(input.product_id, input.product_name, input.product_price, input.product_quantity),
        }
    }
}

/// Stored sale.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Sale {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub customer_id: Uuid,
    #[serde(flatten)]
    pub line: ProductLine,
}

impl Sale {
    pub fn total_value(&self) -> Option<f64> { self.line.total_value() }

    /// Replace references and every product field, keeping the id.
    pub fn apply(&mut self, input: SaleInput) {
        self.seller_id = input.seller_id;
        self.customer_id = input.customer_id;
        self.line = ProductLine::new(input.product_id, input.product_name, input.product_price, input.product_quantity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(price: Option<f64>, quantity: Option<i32>) -> SaleInput {
        SaleInput {
            seller_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            product_id: Some(1),
            product_name: Some("Pen".into()),
            product_price: price,
            product_quantity: quantity,
        }
    }

    #[test]
    fn new_sale_derives_total() {
        assert_eq!(NewSale::from(input(Some(10.0), Some(3))).line.total_value(), Some(30.0));
        assert_eq!(NewSale::from(input(None, Some(3))).line.total_value(), None);
        assert_eq!(NewSale::from(input(Some(10.0), None)).line.total_value(), None);
    }

    #[test]
    fn setters_keep_total_in_step() {
        let mut line = ProductLine::new(None, None, Some(2.0), Some(4));
        assert_eq!(line.total_value(), Some(8.0));
        line.set_product_quantity(Some(5));
        assert_eq!(line.total_value(), Some(10.0));
        line.set_product_price(None);
        assert_eq!(line.total_value(), None);
        line.set_product_price(Some(1.5));
        assert_eq!(line.total_value(), Some(7.5));
    }

    #[test]
    fn apply_replaces_fields_and_keeps_id() {
        let id = Uuid::new_v4();
        let mut sale = Sale { id, seller_id: Uuid::new_v4(), customer_id: Uuid::new_v4(), line: ProductLine::restore(None, None, None, None, Some(0.0)) };
        let replacement = input(Some(3.0), Some(3));
        sale.apply(replacement.clone());
        assert_eq!(sale.id, id);
        assert_eq!(sale.seller_id, replacement.seller_id);
        assert_eq!(sale.customer_id, replacement.customer_id);
        assert_eq!(sale.line.product_name.as_deref(), Some("Pen"));
        assert_eq!(sale.total_value(), Some(9.0));
    }

    #[test]
    fn zeroing_only_touches_undefined_totals() {
        let mut undefined = ProductLine::new(None, None, None, Some(2));
        assert!(undefined.zero_undefined_total());
        assert_eq!(undefined.total_value(), Some(0.0));
        assert!(!undefined.zero_undefined_total());

        let mut defined = ProductLine::new(None, None, Some(5.0), Some(1));
        assert!(!defined.zero_undefined_total());
        assert_eq!(defined.total_value(), Some(5.0));
    }

    #[test]
    fn client_total_is_ignored() {
        let body = serde_json::json!({
            "seller_id": Uuid::new_v4(),
            "customer_id": Uuid::new_v4(),
            "product_price": 2.0,
            "product_quantity": 2,
            "total_value": 999.0
        });
        let parsed: SaleInput = serde_json::from_value(body).unwrap();
        assert_eq!(NewSale::from(parsed).line.total_value(), Some(4.0));
    }

    #[test]
    fn sale_serializes_flat() {
        let sale = Sale { id: Uuid::nil(), seller_id: Uuid::nil(), customer_id: Uuid::nil(), line: ProductLine::new(Some(9), Some("Cup".into()), Some(1.25), Some(4)) };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["product_name"], "Cup");
        assert_eq!(json["total_value"], 5.0);
        assert_eq!(json["product_quantity"], 4);
    }
}
