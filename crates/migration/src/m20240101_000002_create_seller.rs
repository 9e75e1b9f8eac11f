//! Create `seller` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Seller::Table)
                    .if_not_exists()
                    .col(uuid(Seller::Id).primary_key())
                    .col(string_len(Seller::Name, 128).not_null())
                    .col(string_len(Seller::Email, 256).not_null())
                    .col(string_len_null(Seller::TaxId, 32))
                    .col(double_null(Seller::Salary))
                    .col(timestamp_with_time_zone(Seller::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Seller::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Seller::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Seller { Table, Id, Name, Email, TaxId, Salary, CreatedAt, UpdatedAt }
