//! Create `sale` table.
//!
//! `seller_id` and `customer_id` are plain columns without foreign key
//! constraints: removing a seller or customer leaves its sales in place.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sale::Table)
                    .if_not_exists()
                    .col(uuid(Sale::Id).primary_key())
                    .col(uuid(Sale::SellerId).not_null())
                    .col(uuid(Sale::CustomerId).not_null())
                    .col(big_integer_null(Sale::ProductId))
                    .col(string_len_null(Sale::ProductName, 256))
                    .col(double_null(Sale::ProductPrice))
                    .col(integer_null(Sale::ProductQuantity))
                    .col(double_null(Sale::TotalValue))
                    .col(timestamp_with_time_zone(Sale::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Sale::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Sale::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Sale {
    Table,
    Id,
    SellerId,
    CustomerId,
    ProductId,
    ProductName,
    ProductPrice,
    ProductQuantity,
    TotalValue,
    CreatedAt,
    UpdatedAt,
}
