//! Create `service_items` table.
//! Prices are integer cents; a category cannot be removed while items use it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceItems::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceItems::Id))
                    .col(integer(ServiceItems::CategoryId).not_null())
                    .col(string_len(ServiceItems::Title, 255).not_null())
                    .col(text_null(ServiceItems::Description))
                    .col(big_integer(ServiceItems::PriceCents).not_null())
                    .col(string_len_null(ServiceItems::Unit, 50))
                    .col(text_null(ServiceItems::Images))
                    .col(boolean(ServiceItems::IsOnSale).not_null().default(true))
                    .col(integer_null(ServiceItems::ServiceProviderId))
                    .col(timestamp_with_time_zone(ServiceItems::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceItems::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_category")
                            .from(ServiceItems::Table, ServiceItems::CategoryId)
                            .to(ServiceCategories::Table, ServiceCategories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_provider")
                            .from(ServiceItems::Table, ServiceItems::ServiceProviderId)
                            .to(ServiceProviders::Table, ServiceProviders::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceItems::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceItems {
    Table,
    Id,
    CategoryId,
    Title,
    Description,
    PriceCents,
    Unit,
    Images,
    IsOnSale,
    ServiceProviderId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCategories { Table, Id }

#[derive(DeriveIden)]
enum ServiceProviders { Table, Id }
