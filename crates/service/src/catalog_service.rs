//! Service catalog: categories, items, provider profiles and provider reviews.
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use common::pagination::Pagination;
use common::types::Page;
use models::{order_review, service_category, service_item, service_provider};

/// Item with its category embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: service_item::Model,
    pub category: Option<service_category::Model>,
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<service_category::CategoryNode>, ServiceError> {
    let all = service_category::list_all(db).await?;
    Ok(service_category::build_tree(&all))
}

/// Items filtered by category, newest first.
pub async fn list_items(
    db: &DatabaseConnection,
    category_id: Option<i32>,
    opts: Pagination,
) -> Result<Page<ItemView>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut query = service_item::Entity::find();
    if let Some(cid) = category_id {
        query = query.filter(service_item::Column::CategoryId.eq(cid));
    }
    let paginator = query
        .order_by_desc(service_item::Column::Id)
        .find_also_related(service_category::Entity)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Page {
        items: rows.into_iter().map(|(item, category)| ItemView { item, category }).collect(),
        page: page_idx + 1,
        per_page,
        total,
    })
}

pub async fn get_item(db: &DatabaseConnection, id: i32) -> Result<ItemView, ServiceError> {
    let (item, category) = service_item::Entity::find_by_id(id)
        .find_also_related(service_category::Entity)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Service item not found".into()))?;
    Ok(ItemView { item, category })
}

pub async fn provider_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Option<service_provider::Model>, ServiceError> {
    Ok(service_provider::find_by_user(db, user_id).await?)
}

/// Providers list their own items; other users are refused.
#[instrument(skip(db, input), fields(category_id = input.category_id))]
pub async fn add_item(
    db: &DatabaseConnection,
    user_id: i32,
    mut input: service_item::NewServiceItem,
) -> Result<service_item::Model, ServiceError> {
    let provider = provider_for_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("Only service providers can add service items".into()))?;
    input.service_provider_id = Some(provider.id);
    let item = service_item::create(db, input).await?;
    info!(item_id = item.id, provider_id = provider.id, "service_item_added");
    Ok(item)
}

#[instrument(skip(db, input))]
pub async fn register_provider(
    db: &DatabaseConnection,
    user_id: i32,
    input: service_provider::NewProvider,
) -> Result<service_provider::Model, ServiceError> {
    if service_provider::find_by_user(db, user_id).await?.is_some() {
        return Err(ServiceError::Duplicate("User already registered as a service provider".into()));
    }
    service_provider::validate(&input)?;
    if service_provider::find_by_id_card(db, &input.id_card).await?.is_some() {
        return Err(ServiceError::Duplicate("ID card already registered".into()));
    }
    let created = service_provider::create(db, user_id, input).await?;
    info!(provider_id = created.id, user_id, "service_provider_registered");
    Ok(created)
}

pub async fn provider_reviews(db: &DatabaseConnection, provider_id: i32) -> Result<Vec<order_review::Model>, ServiceError> {
    let exists = service_provider::Entity::find_by_id(provider_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if exists.is_none() {
        return Err(ServiceError::NotFound("Service provider not found".into()));
    }
    order_review::Entity::find()
        .filter(order_review::Column::ServiceProviderId.eq(provider_id))
        .order_by_desc(order_review::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
