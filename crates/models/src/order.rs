use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order_review, service_item, service_provider, user, user_coupon, validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// pending -> paid -> completed, or pending/paid -> cancelled.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Completed)
                | (OrderStatus::Paid, OrderStatus::Cancelled)
        )
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_no: String,
    pub user_id: i32,
    pub service_item_id: i32,
    pub service_provider_id: Option<i32>,
    pub user_coupon_id: Option<i32>,
    pub total_amount_cents: i64,
    pub discount_cents: i64,
    pub paid_amount_cents: Option<i64>,
    pub status: OrderStatus,
    pub appointment_time: DateTimeWithTimeZone,
    pub address: String,
    pub remark: Option<String>,
    pub pay_method: Option<String>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    ServiceItem,
    ServiceProvider,
    UserCoupon,
    Review,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::ServiceItem => Entity::belongs_to(service_item::Entity)
                .from(Column::ServiceItemId)
                .to(service_item::Column::Id)
                .into(),
            Relation::ServiceProvider => Entity::belongs_to(service_provider::Entity)
                .from(Column::ServiceProviderId)
                .to(service_provider::Column::Id)
                .into(),
            Relation::UserCoupon => Entity::belongs_to(user_coupon::Entity)
                .from(Column::UserCouponId)
                .to(user_coupon::Column::Id)
                .into(),
            Relation::Review => Entity::has_one(order_review::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<service_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItem.def()
    }
}

impl Related<service_provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceProvider.def()
    }
}

impl Related<order_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// `YYYYMMDDHHMMSS` + user id padded to four digits + four random digits.
pub fn generate_order_no(user_id: i32, now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}{:04}{}", now.format("%Y%m%d%H%M%S"), user_id, suffix)
}

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub user_id: i32,
    pub service_item_id: i32,
    pub service_provider_id: Option<i32>,
    pub user_coupon_id: Option<i32>,
    pub total_amount_cents: i64,
    pub discount_cents: i64,
    pub appointment_time: DateTimeWithTimeZone,
    pub address: String,
    pub remark: Option<String>,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewOrder) -> Result<Model, errors::ModelError> {
    validation::require("address", &input.address)?;
    validation::max_len("address", &input.address, 255)?;
    if input.total_amount_cents < 0 || input.discount_cents < 0 {
        return Err(errors::ModelError::validation("order amounts must not be negative"));
    }
    let now = Utc::now();
    let am = ActiveModel {
        order_no: Set(generate_order_no(input.user_id, now)),
        user_id: Set(input.user_id),
        service_item_id: Set(input.service_item_id),
        service_provider_id: Set(input.service_provider_id),
        user_coupon_id: Set(input.user_coupon_id),
        total_amount_cents: Set(input.total_amount_cents),
        discount_cents: Set(input.discount_cents),
        paid_amount_cents: Set(None),
        status: Set(OrderStatus::Pending),
        appointment_time: Set(input.appointment_time),
        address: Set(input.address),
        remark: Set(input.remark),
        pay_method: Set(None),
        paid_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

/// Move an order to `next`, rejecting transitions outside the lifecycle.
pub async fn transition<C: ConnectionTrait>(
    db: &C,
    model: Model,
    next: OrderStatus,
) -> Result<Model, errors::ModelError> {
    if !model.status.can_transition_to(next) {
        return Err(errors::ModelError::Validation(format!(
            "Order cannot move from {} to {}",
            model.status.as_str(),
            next.as_str()
        )));
    }
    let mut am: ActiveModel = model.into();
    am.status = Set(next);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(errors::ModelError::from)
}

/// Apply a successful payment: status `paid`, paid amount equal to the total.
pub async fn mark_paid<C: ConnectionTrait>(
    db: &C,
    model: Model,
    pay_method: &str,
) -> Result<Model, errors::ModelError> {
    if !model.status.can_transition_to(OrderStatus::Paid) {
        return Err(errors::ModelError::validation("Order is not in pending state"));
    }
    let now = Utc::now();
    let total = model.total_amount_cents;
    let mut am: ActiveModel = model.into();
    am.status = Set(OrderStatus::Paid);
    am.paid_amount_cents = Set(Some(total));
    am.pay_method = Set(Some(pay_method.to_string()));
    am.paid_at = Set(Some(now.into()));
    am.updated_at = Set(now.into());
    am.update(db).await.map_err(errors::ModelError::from)
}
