use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order, service_provider, user, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_id: i32,
    pub user_id: i32,
    pub service_provider_id: Option<i32>,
    pub rating: i32,
    pub comment: String,
    pub images: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Order,
    User,
    ServiceProvider,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Order => Entity::belongs_to(order::Entity)
                .from(Column::OrderId)
                .to(order::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::ServiceProvider => Entity::belongs_to(service_provider::Entity)
                .from(Column::ServiceProviderId)
                .to(service_provider::Column::Id)
                .into(),
        }
    }
}

impl Related<order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<service_provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceProvider.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i32) -> Result<(), errors::ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(errors::ModelError::validation("Rating must be between 1 and 5"));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    order: &order::Model,
    rating: i32,
    comment: &str,
    images: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_rating(rating)?;
    validation::require("comment", comment)?;
    let am = ActiveModel {
        order_id: Set(order.id),
        user_id: Set(order.user_id),
        service_provider_id: Set(order.service_provider_id),
        rating: Set(rating),
        comment: Set(comment.to_string()),
        images: Set(images),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}
