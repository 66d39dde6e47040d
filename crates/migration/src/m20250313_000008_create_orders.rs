//! Create `orders` table.
//!
//! Users and items with orders cannot be deleted; provider and coupon links
//! are cleared when their rows go away.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_auto(Orders::Id))
                    .col(string_len(Orders::OrderNo, 255).unique_key().not_null())
                    .col(integer(Orders::UserId).not_null())
                    .col(integer(Orders::ServiceItemId).not_null())
                    .col(integer_null(Orders::ServiceProviderId))
                    .col(integer_null(Orders::UserCouponId))
                    .col(big_integer(Orders::TotalAmountCents).not_null())
                    .col(big_integer(Orders::DiscountCents).not_null().default(0))
                    .col(big_integer_null(Orders::PaidAmountCents))
                    .col(string_len(Orders::Status, 50).not_null())
                    .col(timestamp_with_time_zone(Orders::AppointmentTime).not_null())
                    .col(string_len(Orders::Address, 255).not_null())
                    .col(text_null(Orders::Remark))
                    .col(string_len_null(Orders::PayMethod, 50))
                    .col(timestamp_with_time_zone_null(Orders::PaidAt))
                    .col(timestamp_with_time_zone(Orders::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Orders::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item")
                            .from(Orders::Table, Orders::ServiceItemId)
                            .to(ServiceItems::Table, ServiceItems::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_provider")
                            .from(Orders::Table, Orders::ServiceProviderId)
                            .to(ServiceProviders::Table, ServiceProviders::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user_coupon")
                            .from(Orders::Table, Orders::UserCouponId)
                            .to(UserCoupons::Table, UserCoupons::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNo,
    UserId,
    ServiceItemId,
    ServiceProviderId,
    UserCouponId,
    TotalAmountCents,
    DiscountCents,
    PaidAmountCents,
    Status,
    AppointmentTime,
    Address,
    Remark,
    PayMethod,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum ServiceItems { Table, Id }

#[derive(DeriveIden)]
enum ServiceProviders { Table, Id }

#[derive(DeriveIden)]
enum UserCoupons { Table, Id }
