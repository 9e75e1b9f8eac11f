use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sale: lookups by seller and by customer
        manager
            .create_index(
                Index::create()
                    .name("idx_sale_seller")
                    .table(Sale::Table)
                    .col(Sale::SellerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_sale_customer")
                    .table(Sale::Table)
                    .col(Sale::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Sale: threshold query and the null-total correction both filter on total_value
        manager
            .create_index(
                Index::create()
                    .name("idx_sale_total_value")
                    .table(Sale::Table)
                    .col(Sale::TotalValue)
                    .to_owned(),
            )
            .await?;

        // Seller: salary ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_seller_salary")
                    .table(Seller::Table)
                    .col(Seller::Salary)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sale_seller").table(Sale::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_sale_customer").table(Sale::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_sale_total_value").table(Sale::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_seller_salary").table(Seller::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sale { Table, SellerId, CustomerId, TotalValue }

#[derive(DeriveIden)]
enum Seller { Table, Salary }
