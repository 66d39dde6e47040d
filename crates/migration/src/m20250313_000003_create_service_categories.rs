//! Create `service_categories` table.
//!
//! Self-referencing `parent_id` turns categories into a tree; removing a
//! parent detaches its children instead of deleting them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceCategories::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceCategories::Id))
                    .col(string_len(ServiceCategories::Name, 255).unique_key().not_null())
                    .col(integer_null(ServiceCategories::ParentId))
                    .col(string_len_null(ServiceCategories::Icon, 255))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent")
                            .from(ServiceCategories::Table, ServiceCategories::ParentId)
                            .to(ServiceCategories::Table, ServiceCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceCategories::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceCategories { Table, Id, Name, ParentId, Icon }
