use sea_orm::{entity::prelude::*, ConnectionTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, user_coupon, validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed")]
    Fixed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_type: DiscountType,
    /// Percent (1..=100) or a fixed amount in cents, depending on `discount_type`.
    pub discount_value: i64,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub is_active: bool,
    pub min_spend_cents: Option<i64>,
    pub max_discount_cents: Option<i64>,
    /// Maximum number of claims across all users.
    pub usage_limit: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserCoupon,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserCoupon => Entity::has_many(user_coupon::Entity).into(),
        }
    }
}

impl Related<user_coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCoupon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Active and `now` within `[start_date, end_date]`.
    pub fn is_valid_at(&self, now: DateTimeWithTimeZone) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }

    /// Discount in cents this coupon grants on `amount_cents`.
    pub fn discount_for(&self, amount_cents: i64) -> Result<i64, errors::ModelError> {
        if let Some(min) = self.min_spend_cents {
            if amount_cents < min {
                return Err(errors::ModelError::validation(
                    "Order amount does not meet the coupon minimum spend",
                ));
            }
        }
        let raw = match self.discount_type {
            DiscountType::Percentage => amount_cents.saturating_mul(self.discount_value) / 100,
            DiscountType::Fixed => self.discount_value,
        };
        let capped = match self.max_discount_cents {
            Some(max) => raw.min(max),
            None => raw,
        };
        Ok(capped.clamp(0, amount_cents.max(0)))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCoupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub is_active: Option<bool>,
    pub min_spend_cents: Option<i64>,
    pub max_discount_cents: Option<i64>,
    pub usage_limit: Option<i32>,
}

pub fn validate_terms(
    discount_type: DiscountType,
    discount_value: i64,
    start_date: DateTimeWithTimeZone,
    end_date: DateTimeWithTimeZone,
) -> Result<(), errors::ModelError> {
    match discount_type {
        DiscountType::Percentage if !(1..=100).contains(&discount_value) => {
            return Err(errors::ModelError::validation("percentage discount must be between 1 and 100"));
        }
        DiscountType::Fixed if discount_value <= 0 => {
            return Err(errors::ModelError::validation("fixed discount must be positive"));
        }
        _ => {}
    }
    if start_date > end_date {
        return Err(errors::ModelError::validation("start_date must not be after end_date"));
    }
    Ok(())
}

pub fn validate(input: &NewCoupon) -> Result<(), errors::ModelError> {
    validation::require("code", &input.code)?;
    validation::max_len("code", &input.code, 50)?;
    validate_terms(input.discount_type, input.discount_value, input.start_date, input.end_date)?;
    if matches!(input.min_spend_cents, Some(v) if v < 0) {
        return Err(errors::ModelError::validation("min_spend must not be negative"));
    }
    if matches!(input.max_discount_cents, Some(v) if v <= 0) {
        return Err(errors::ModelError::validation("max_discount must be positive"));
    }
    if matches!(input.usage_limit, Some(v) if v <= 0) {
        return Err(errors::ModelError::validation("usage_limit must be positive"));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewCoupon) -> Result<Model, errors::ModelError> {
    validate(&input)?;
    let am = ActiveModel {
        code: Set(input.code.trim().to_string()),
        discount_type: Set(input.discount_type),
        discount_value: Set(input.discount_value),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        is_active: Set(input.is_active.unwrap_or(true)),
        min_spend_cents: Set(input.min_spend_cents),
        max_discount_cents: Set(input.max_discount_cents),
        usage_limit: Set(input.usage_limit),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

pub async fn find_by_code<C: ConnectionTrait>(db: &C, code: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Code.eq(code.trim()))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}
