//! `sale` entity.
//!
//! `total_value` is derived from `product_price` and `product_quantity`.
//! [`compute_total`] holds the rule and the `before_save` hook reapplies it on
//! every insert/update issued through an `ActiveModel`. Bulk statements built
//! with `update_many` bypass the hook.
use sea_orm::{entity::prelude::*, ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{customer, seller};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub seller_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
    pub product_quantity: Option<i32>,
    pub total_value: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Seller, Customer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Seller => Entity::belongs_to(seller::Entity)
                .from(Column::SellerId)
                .to(seller::Column::Id)
                .into(),
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
        }
    }
}

impl Related<seller::Entity> for Entity {
    fn to() -> RelationDef { Relation::Seller.def() }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

/// `price * quantity` when both are known, otherwise undefined.
pub fn compute_total(price: Option<f64>, quantity: Option<i32>) -> Option<f64> {
    match (price, quantity) {
        (Some(p), Some(q)) => Some(p * f64::from(q)),
        _ => None,
    }
}

fn known<V>(value: &ActiveValue<V>) -> Option<V>
where
    V: Into<Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // Partial active models that leave price or quantity unset keep their stored total.
        if let (Some(price), Some(quantity)) = (known(&self.product_price), known(&self.product_quantity)) {
            self.total_value = Set(compute_total(price, quantity));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_price_times_quantity() {
        assert_eq!(compute_total(Some(10.0), Some(3)), Some(30.0));
        assert_eq!(compute_total(Some(2.5), Some(0)), Some(0.0));
    }

    #[test]
    fn total_is_undefined_when_an_input_is_missing() {
        assert_eq!(compute_total(None, Some(3)), None);
        assert_eq!(compute_total(Some(10.0), None), None);
        assert_eq!(compute_total(None, None), None);
    }

    #[test]
    fn known_reads_set_and_unchanged() {
        assert_eq!(known(&ActiveValue::Set(Some(1.5_f64))), Some(Some(1.5)));
        assert_eq!(known(&ActiveValue::Unchanged(None::<i32>)), Some(None));
        assert_eq!(known(&ActiveValue::<Option<i32>>::NotSet), None);
    }
}
