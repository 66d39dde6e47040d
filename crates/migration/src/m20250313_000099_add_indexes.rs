use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Addresses: lookup by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_address_user")
                    .table(Addresses::Table)
                    .col(Addresses::UserId)
                    .to_owned(),
            )
            .await?;

        // ServiceItems: listing filtered by category
        manager
            .create_index(
                Index::create()
                    .name("idx_item_category")
                    .table(ServiceItems::Table)
                    .col(ServiceItems::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Orders: customer and provider listings filtered by status
        manager
            .create_index(
                Index::create()
                    .name("idx_order_user_status")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_order_provider_status")
                    .table(Orders::Table)
                    .col(Orders::ServiceProviderId)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        // OrderReviews: reviews received by a provider
        manager
            .create_index(
                Index::create()
                    .name("idx_review_provider")
                    .table(OrderReviews::Table)
                    .col(OrderReviews::ServiceProviderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_address_user").table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_item_category").table(ServiceItems::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_user_status").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_provider_status").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_provider").table(OrderReviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Addresses { Table, UserId }

#[derive(DeriveIden)]
enum ServiceItems { Table, CategoryId }

#[derive(DeriveIden)]
enum Orders { Table, UserId, ServiceProviderId, Status }

#[derive(DeriveIden)]
enum OrderReviews { Table, ServiceProviderId }
