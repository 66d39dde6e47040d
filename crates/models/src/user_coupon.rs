use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{coupon, errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub coupon_id: i32,
    pub claimed_at: DateTimeWithTimeZone,
    pub used_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Coupon,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Coupon => Entity::belongs_to(coupon::Entity)
                .from(Column::CouponId)
                .to(coupon::Column::Id)
                .into(),
        }
    }
}

impl Related<coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coupon.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, user_id: i32, coupon_id: i32) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        user_id: Set(user_id),
        coupon_id: Set(coupon_id),
        claimed_at: Set(Utc::now().into()),
        used_at: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

pub async fn find_claim<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    coupon_id: i32,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::CouponId.eq(coupon_id))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}

/// Stamp `used_at` on a claim that is still unused.
///
/// The `used_at IS NULL` filter is part of the write, so of two concurrent
/// redemptions only one sees a row affected. Returns false for the loser.
pub async fn mark_used<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::UsedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::UsedAt.is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Make a redeemed claim usable again. Returns false when no such claim exists.
pub async fn clear_used<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::UsedAt, Expr::value(Option::<DateTimeWithTimeZone>::None))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}
