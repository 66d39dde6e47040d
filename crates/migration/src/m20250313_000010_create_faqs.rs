//! Create `faqs` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Faqs::Table)
                    .if_not_exists()
                    .col(pk_auto(Faqs::Id))
                    .col(string_len(Faqs::Question, 255).not_null())
                    .col(text(Faqs::Answer).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Faqs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Faqs { Table, Id, Question, Answer }
