#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with the schema applied.
///
/// Every call gets its own single-connection SQLite database, so tests never
/// observe each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::in_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Insert a user directly, bypassing password hashing.
pub async fn user(db: &DatabaseConnection, name: &str) -> Result<models::user::Model, anyhow::Error> {
    Ok(models::user::create(db, name, &format!("{name}@example.com"), None, "$argon2id$test").await?)
}

pub fn provider_input(id_card: &str) -> models::service_provider::NewProvider {
    models::service_provider::NewProvider {
        real_name: "Li Wei".into(),
        id_card: id_card.into(),
        phone: "13800138000".into(),
        address: Some("Chaoyang".into()),
        ..Default::default()
    }
}

/// Category plus an on-sale item priced at `price_cents`, optionally owned by a provider.
pub async fn item(
    db: &DatabaseConnection,
    price_cents: i64,
    provider_id: Option<i32>,
) -> Result<models::service_item::Model, anyhow::Error> {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let n = SEQ.fetch_add(1, Ordering::Relaxed);
    let cat = models::service_category::create(db, &format!("category-{n}"), None, None).await?;
    Ok(models::service_item::create(
        db,
        models::service_item::NewServiceItem {
            category_id: cat.id,
            title: "Standard cleaning".into(),
            price_cents,
            unit: Some("visit".into()),
            service_provider_id: provider_id,
            ..Default::default()
        },
    )
    .await?)
}
