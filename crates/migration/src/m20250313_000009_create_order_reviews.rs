//! Create `order_reviews` table; one review per order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderReviews::Table)
                    .if_not_exists()
                    .col(pk_auto(OrderReviews::Id))
                    .col(integer(OrderReviews::OrderId).unique_key().not_null())
                    .col(integer(OrderReviews::UserId).not_null())
                    .col(integer_null(OrderReviews::ServiceProviderId))
                    .col(integer(OrderReviews::Rating).not_null())
                    .col(text(OrderReviews::Comment).not_null())
                    .col(text_null(OrderReviews::Images))
                    .col(timestamp_with_time_zone(OrderReviews::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_order")
                            .from(OrderReviews::Table, OrderReviews::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(OrderReviews::Table, OrderReviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_provider")
                            .from(OrderReviews::Table, OrderReviews::ServiceProviderId)
                            .to(ServiceProviders::Table, ServiceProviders::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderReviews::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderReviews { Table, Id, OrderId, UserId, ServiceProviderId, Rating, Comment, Images, CreatedAt }

#[derive(DeriveIden)]
enum Orders { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum ServiceProviders { Table, Id }
