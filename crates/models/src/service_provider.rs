use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order, order_review, service_item, user, validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_providers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub real_name: String,
    #[sea_orm(unique)]
    pub id_card: String,
    pub phone: String,
    pub address: Option<String>,
    pub experience: Option<String>,
    pub certificates: Option<String>,
    pub is_verified: bool,
    pub status: ProviderStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    ServiceItem,
    Order,
    OrderReview,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::ServiceItem => Entity::has_many(service_item::Entity).into(),
            Relation::Order => Entity::has_many(order::Entity).into(),
            Relation::OrderReview => Entity::has_many(order_review::Entity).into(),
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

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewProvider {
    pub real_name: String,
    pub id_card: String,
    pub phone: String,
    pub address: Option<String>,
    pub experience: Option<String>,
    pub certificates: Option<String>,
}

pub fn validate(input: &NewProvider) -> Result<(), errors::ModelError> {
    validation::require("real_name", &input.real_name)?;
    validation::require("id_card", &input.id_card)?;
    validation::require("phone", &input.phone)?;
    validation::require("address", input.address.as_deref().unwrap_or_default())?;
    validation::max_len("real_name", &input.real_name, 255)?;
    validation::max_len("id_card", &input.id_card, 18)?;
    validation::validate_phone(&input.phone)
}

pub async fn create(db: &DatabaseConnection, user_id: i32, input: NewProvider) -> Result<Model, errors::ModelError> {
    validate(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        user_id: Set(user_id),
        real_name: Set(input.real_name.trim().to_string()),
        id_card: Set(input.id_card.trim().to_string()),
        phone: Set(input.phone),
        address: Set(input.address),
        experience: Set(input.experience),
        certificates: Set(input.certificates),
        is_verified: Set(false),
        status: Set(ProviderStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}

pub async fn find_by_id_card(db: &DatabaseConnection, id_card: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::IdCard.eq(id_card.trim()))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}

/// Approve or reject a provider; approval also marks the profile verified.
pub async fn set_review_outcome(
    db: &DatabaseConnection,
    id: i32,
    approve: bool,
) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(errors::ModelError::from)?
        .ok_or_else(|| errors::ModelError::validation("service provider not found"))?
        .into();
    found.status = Set(if approve { ProviderStatus::Approved } else { ProviderStatus::Rejected });
    found.is_verified = Set(approve);
    found.updated_at = Set(Utc::now().into());
    found.update(db).await.map_err(errors::ModelError::from)
}
