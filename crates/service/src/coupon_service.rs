//! Coupons: creation, claiming, listing and redemption against orders.
use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use models::{coupon, user_coupon};

/// A claimed coupon with the coupon terms embedded.
#[derive(Debug, Clone, Serialize)]
pub struct UserCouponView {
    #[serde(flatten)]
    pub claim: user_coupon::Model,
    pub coupon: Option<coupon::Model>,
}

#[instrument(skip(db, input), fields(code = %input.code))]
pub async fn create_coupon(db: &DatabaseConnection, input: coupon::NewCoupon) -> Result<coupon::Model, ServiceError> {
    coupon::validate(&input)?;
    if coupon::find_by_code(db, &input.code).await?.is_some() {
        return Err(ServiceError::Duplicate("Coupon code already exists".into()));
    }
    let created = coupon::create(db, input).await?;
    info!(coupon_id = created.id, "coupon_created");
    Ok(created)
}

/// Active coupons whose validity window covers the current time.
pub async fn list_available(db: &DatabaseConnection) -> Result<Vec<coupon::Model>, ServiceError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let active = coupon::Entity::find()
        .filter(coupon::Column::IsActive.eq(true))
        .order_by_asc(coupon::Column::EndDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(active.into_iter().filter(|c| c.is_valid_at(now)).collect())
}

#[instrument(skip(db))]
pub async fn claim_coupon(db: &DatabaseConnection, user_id: i32, code: &str) -> Result<UserCouponView, ServiceError> {
    if code.trim().is_empty() {
        return Err(ServiceError::Validation("Missing required field: code".into()));
    }
    let found = coupon::find_by_code(db, code)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| ServiceError::NotFound("Invalid or expired coupon code".into()))?;
    if !found.is_valid_at(Utc::now().into()) {
        return Err(ServiceError::Validation("Coupon is expired or not active".into()));
    }
    if user_coupon::find_claim(db, user_id, found.id).await?.is_some() {
        return Err(ServiceError::Validation("User has already claimed this coupon".into()));
    }
    let txn = db.begin().await.map_err(ServiceError::from_db)?;
    if let Some(limit) = found.usage_limit {
        // Row lock makes count-then-insert atomic per coupon on Postgres.
        coupon::Entity::find_by_id(found.id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::from_db)?;
        let claimed = user_coupon::Entity::find()
            .filter(user_coupon::Column::CouponId.eq(found.id))
            .count(&txn)
            .await
            .map_err(ServiceError::from_db)?;
        if claimed >= limit.max(0) as u64 {
            return Err(ServiceError::Validation("Coupon usage limit reached".into()));
        }
    }
    let claim = user_coupon::create(&txn, user_id, found.id).await?;
    txn.commit().await.map_err(ServiceError::from_db)?;
    info!(user_coupon_id = claim.id, coupon_id = found.id, "coupon_claimed");
    Ok(UserCouponView { claim, coupon: Some(found) })
}

pub async fn my_coupons(db: &DatabaseConnection, user_id: i32) -> Result<Vec<UserCouponView>, ServiceError> {
    let rows = user_coupon::Entity::find()
        .filter(user_coupon::Column::UserId.eq(user_id))
        .order_by_desc(user_coupon::Column::ClaimedAt)
        .find_also_related(coupon::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows.into_iter().map(|(claim, coupon)| UserCouponView { claim, coupon }).collect())
}

/// Redeem a claimed coupon against `amount_cents`, returning the claim id and discount.
///
/// Runs on the caller's connection so order creation can keep it in one transaction.
pub async fn redeem<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    code: &str,
    amount_cents: i64,
) -> Result<(i32, i64), ServiceError> {
    let found = coupon::find_by_code(conn, code)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Invalid or expired coupon code".into()))?;
    if !found.is_valid_at(Utc::now().into()) {
        return Err(ServiceError::Validation("Coupon is expired or not active".into()));
    }
    let claim = user_coupon::find_claim(conn, user_id, found.id)
        .await?
        .ok_or_else(|| ServiceError::Validation("Coupon has not been claimed".into()))?;
    if claim.used_at.is_some() {
        return Err(ServiceError::Validation("Coupon has already been used".into()));
    }
    let discount = found.discount_for(amount_cents)?;
    if !user_coupon::mark_used(conn, claim.id).await? {
        return Err(ServiceError::Validation("Coupon has already been used".into()));
    }
    info!(user_coupon_id = claim.id, discount_cents = discount, "coupon_redeemed");
    Ok((claim.id, discount))
}

/// Make a redeemed coupon usable again.
pub async fn release<C: ConnectionTrait>(conn: &C, user_coupon_id: i32) -> Result<(), ServiceError> {
    if user_coupon::clear_used(conn, user_coupon_id).await? {
        info!(user_coupon_id, "coupon_released");
    } else {
        warn!(user_coupon_id, "coupon_release_missing_claim");
    }
    Ok(())
}
