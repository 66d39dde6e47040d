//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250313_000001_create_users;
mod m20250313_000002_create_addresses;
mod m20250313_000003_create_service_categories;
mod m20250313_000004_create_service_providers;
mod m20250313_000005_create_service_items;
mod m20250313_000006_create_coupons;
mod m20250313_000007_create_user_coupons;
mod m20250313_000008_create_orders;
mod m20250313_000009_create_order_reviews;
mod m20250313_000010_create_faqs;
mod m20250313_000099_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250313_000001_create_users::Migration),
            Box::new(m20250313_000002_create_addresses::Migration),
            Box::new(m20250313_000003_create_service_categories::Migration),
            Box::new(m20250313_000004_create_service_providers::Migration),
            Box::new(m20250313_000005_create_service_items::Migration),
            Box::new(m20250313_000006_create_coupons::Migration),
            Box::new(m20250313_000007_create_user_coupons::Migration),
            Box::new(m20250313_000008_create_orders::Migration),
            Box::new(m20250313_000009_create_order_reviews::Migration),
            Box::new(m20250313_000010_create_faqs::Migration),
            // Indexes should always be applied last
            Box::new(m20250313_000099_add_indexes::Migration),
        ]
    }
}
