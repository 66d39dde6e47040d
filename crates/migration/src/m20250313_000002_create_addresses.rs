//! Create `addresses` table with FK to `users`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(pk_auto(Addresses::Id))
                    .col(integer(Addresses::UserId).not_null())
                    .col(string_len(Addresses::Province, 50).not_null())
                    .col(string_len(Addresses::City, 50).not_null())
                    .col(string_len(Addresses::District, 50).not_null())
                    .col(string_len(Addresses::DetailAddress, 255).not_null())
                    .col(string_len(Addresses::Phone, 20).not_null())
                    .col(string_len_null(Addresses::Name, 100))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_user")
                            .from(Addresses::Table, Addresses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Addresses::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Addresses { Table, Id, UserId, Province, City, District, DetailAddress, Phone, Name }

#[derive(DeriveIden)]
enum Users { Table, Id }
