//! Order lifecycle: creation (with optional coupon), listing, cancellation,
//! completion and reviews.
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, TransactionTrait};
use tracing::{info, instrument};

use crate::{coupon_service, errors::ServiceError, paging};
use common::pagination::Pagination;
use common::types::Page;
use models::order::{self, OrderStatus};
use models::{order_review, service_item, service_provider, validation};

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub service_item_id: i32,
    pub appointment_time: DateTimeWithTimeZone,
    pub address: String,
    pub remark: Option<String>,
    pub coupon_code: Option<String>,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[instrument(skip(db, input), fields(service_item_id = input.service_item_id))]
pub async fn create_order(db: &DatabaseConnection, user_id: i32, input: CreateOrderInput) -> Result<order::Model, ServiceError> {
    validation::require("address", &input.address)?;
    let item = service_item::Entity::find_by_id(input.service_item_id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::NotFound("Service item not found".into()))?;
    if !item.is_on_sale {
        return Err(ServiceError::Validation("Service item is currently not on sale".into()));
    }

    let txn = db.begin().await.map_err(db_err)?;
    let code = input.coupon_code.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let (user_coupon_id, discount_cents) = match code {
        Some(code) => {
            let (id, discount) = coupon_service::redeem(&txn, user_id, code, item.price_cents).await?;
            (Some(id), discount)
        }
        None => (None, 0),
    };
    let created = order::create(
        &txn,
        order::NewOrder {
            user_id,
            service_item_id: item.id,
            service_provider_id: item.service_provider_id,
            user_coupon_id,
            total_amount_cents: item.price_cents - discount_cents,
            discount_cents,
            appointment_time: input.appointment_time,
            address: input.address,
            remark: input.remark,
        },
    )
    .await?;
    txn.commit().await.map_err(db_err)?;
    info!(order_id = created.id, order_no = %created.order_no, total_cents = created.total_amount_cents, "order_created");
    Ok(created)
}

/// Orders are only visible to their owner; anyone else gets not found.
pub async fn get_order(db: &DatabaseConnection, user_id: i32, id: i32) -> Result<order::Model, ServiceError> {
    order::Entity::find_by_id(id)
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::NotFound("Order not found".into()))
}

async fn paginate_orders(
    db: &DatabaseConnection,
    query: Select<order::Entity>,
    status: Option<OrderStatus>,
    opts: Pagination,
) -> Result<Page<order::Model>, ServiceError> {
    let query = match status {
        Some(s) => query.filter(order::Column::Status.eq(s)),
        None => query,
    };
    paging::fetch_page(db, query.order_by_desc(order::Column::Id), opts).await
}

pub async fn list_orders(
    db: &DatabaseConnection,
    user_id: i32,
    status: Option<OrderStatus>,
    opts: Pagination,
) -> Result<Page<order::Model>, ServiceError> {
    let query = order::Entity::find().filter(order::Column::UserId.eq(user_id));
    paginate_orders(db, query, status, opts).await
}

async fn require_provider(db: &DatabaseConnection, user_id: i32) -> Result<service_provider::Model, ServiceError> {
    service_provider::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("Only service providers can manage received orders".into()))
}

/// Orders received by the caller's provider profile.
pub async fn list_provider_orders(
    db: &DatabaseConnection,
    user_id: i32,
    status: Option<OrderStatus>,
    opts: Pagination,
) -> Result<Page<order::Model>, ServiceError> {
    let provider = require_provider(db, user_id).await?;
    let query = order::Entity::find().filter(order::Column::ServiceProviderId.eq(provider.id));
    paginate_orders(db, query, status, opts).await
}

/// Cancel and release a redeemed coupon in one transaction.
pub(crate) async fn cancel_and_release(db: &DatabaseConnection, found: order::Model) -> Result<order::Model, ServiceError> {
    let txn = db.begin().await.map_err(db_err)?;
    let user_coupon_id = found.user_coupon_id;
    let cancelled = order::transition(&txn, found, OrderStatus::Cancelled).await?;
    if let Some(id) = user_coupon_id {
        coupon_service::release(&txn, id).await?;
    }
    txn.commit().await.map_err(db_err)?;
    info!(order_id = cancelled.id, "order_cancelled");
    Ok(cancelled)
}

/// Owners may cancel while the order is still pending.
#[instrument(skip(db))]
pub async fn cancel_order(db: &DatabaseConnection, user_id: i32, id: i32) -> Result<order::Model, ServiceError> {
    let found = get_order(db, user_id, id).await?;
    if found.status != OrderStatus::Pending {
        return Err(ServiceError::Validation("Only pending orders can be cancelled".into()));
    }
    cancel_and_release(db, found).await
}

/// The order's provider marks a paid order as done.
#[instrument(skip(db))]
pub async fn complete_order(db: &DatabaseConnection, user_id: i32, id: i32) -> Result<order::Model, ServiceError> {
    let provider = require_provider(db, user_id).await?;
    let found = order::Entity::find_by_id(id)
        .filter(order::Column::ServiceProviderId.eq(provider.id))
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::NotFound("Order not found".into()))?;
    if found.status != OrderStatus::Paid {
        return Err(ServiceError::Validation("Only paid orders can be completed".into()));
    }
    let done = order::transition(db, found, OrderStatus::Completed).await?;
    info!(order_id = done.id, provider_id = provider.id, "order_completed");
    Ok(done)
}

#[instrument(skip(db, comment, images))]
pub async fn create_review(
    db: &DatabaseConnection,
    user_id: i32,
    order_id: i32,
    rating: i32,
    comment: &str,
    images: Option<String>,
) -> Result<order_review::Model, ServiceError> {
    let found = get_order(db, user_id, order_id).await?;
    if found.status != OrderStatus::Completed {
        return Err(ServiceError::Validation("Order is not completed".into()));
    }
    let existing = order_review::Entity::find()
        .filter(order_review::Column::OrderId.eq(found.id))
        .one(db)
        .await
        .map_err(db_err)?;
    if existing.is_some() {
        return Err(ServiceError::Validation("Order already reviewed".into()));
    }
    let review = order_review::create(db, &found, rating, comment, images).await?;
    info!(review_id = review.id, order_id = found.id, rating, "order_reviewed");
    Ok(review)
}
