//! Create `service_providers` table: the provider profile attached to a user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceProviders::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceProviders::Id))
                    .col(integer(ServiceProviders::UserId).unique_key().not_null())
                    .col(string_len(ServiceProviders::RealName, 255).not_null())
                    .col(string_len(ServiceProviders::IdCard, 18).unique_key().not_null())
                    .col(string_len(ServiceProviders::Phone, 20).not_null())
                    .col(string_len_null(ServiceProviders::Address, 255))
                    .col(text_null(ServiceProviders::Experience))
                    .col(text_null(ServiceProviders::Certificates))
                    .col(boolean(ServiceProviders::IsVerified).not_null().default(false))
                    .col(string_len(ServiceProviders::Status, 50).not_null().default("pending"))
                    .col(timestamp_with_time_zone(ServiceProviders::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceProviders::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_user")
                            .from(ServiceProviders::Table, ServiceProviders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceProviders::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceProviders {
    Table,
    Id,
    UserId,
    RealName,
    IdCard,
    Phone,
    Address,
    Experience,
    Certificates,
    IsVerified,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
