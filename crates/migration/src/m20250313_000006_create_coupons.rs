//! Create `coupons` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(pk_auto(Coupons::Id))
                    .col(string_len(Coupons::Code, 50).unique_key().not_null())
                    .col(string_len(Coupons::DiscountType, 20).not_null())
                    .col(big_integer(Coupons::DiscountValue).not_null())
                    .col(timestamp_with_time_zone(Coupons::StartDate).not_null())
                    .col(timestamp_with_time_zone(Coupons::EndDate).not_null())
                    .col(boolean(Coupons::IsActive).not_null().default(true))
                    .col(big_integer_null(Coupons::MinSpendCents))
                    .col(big_integer_null(Coupons::MaxDiscountCents))
                    .col(integer_null(Coupons::UsageLimit))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Coupons::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    DiscountType,
    DiscountValue,
    StartDate,
    EndDate,
    IsActive,
    MinSpendCents,
    MaxDiscountCents,
    UsageLimit,
}
