//! Create `user_coupons` table: coupons claimed by users.
//!
//! A user holds at most one claim per coupon.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCoupons::Table)
                    .if_not_exists()
                    .col(pk_auto(UserCoupons::Id))
                    .col(integer(UserCoupons::UserId).not_null())
                    .col(integer(UserCoupons::CouponId).not_null())
                    .col(timestamp_with_time_zone(UserCoupons::ClaimedAt).not_null())
                    .col(timestamp_with_time_zone_null(UserCoupons::UsedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_coupon_user")
                            .from(UserCoupons::Table, UserCoupons::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_coupon_coupon")
                            .from(UserCoupons::Table, UserCoupons::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_user_coupon_user_coupon")
                    .table(UserCoupons::Table)
                    .col(UserCoupons::UserId)
                    .col(UserCoupons::CouponId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserCoupons::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserCoupons { Table, Id, UserId, CouponId, ClaimedAt, UsedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Coupons { Table, Id }
