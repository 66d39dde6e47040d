use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order, service_category, service_provider, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub unit: Option<String>,
    /// Comma separated image URLs.
    pub images: Option<String>,
    pub is_on_sale: bool,
    pub service_provider_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
    ServiceProvider,
    Order,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(service_category::Entity)
                .from(Column::CategoryId)
                .to(service_category::Column::Id)
                .into(),
            Relation::ServiceProvider => Entity::belongs_to(service_provider::Entity)
                .from(Column::ServiceProviderId)
                .to(service_provider::Column::Id)
                .into(),
            Relation::Order => Entity::has_many(order::Entity).into(),
        }
    }
}

impl Related<service_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<service_provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceProvider.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewServiceItem {
    pub category_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub unit: Option<String>,
    pub images: Option<String>,
    pub is_on_sale: Option<bool>,
    pub service_provider_id: Option<i32>,
}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    validation::require("title", title)?;
    validation::max_len("title", title, 255)
}

pub fn validate_price(price_cents: i64) -> Result<(), errors::ModelError> {
    if price_cents < 0 {
        return Err(errors::ModelError::validation("price must not be negative"));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewServiceItem) -> Result<Model, errors::ModelError> {
    validate_title(&input.title)?;
    validate_price(input.price_cents)?;
    validation::require("unit", input.unit.as_deref().unwrap_or_default())?;
    let category = service_category::Entity::find_by_id(input.category_id)
        .one(db)
        .await
        .map_err(errors::ModelError::from)?;
    if category.is_none() {
        return Err(errors::ModelError::validation("Service category not found"));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        category_id: Set(input.category_id),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description),
        price_cents: Set(input.price_cents),
        unit: Set(input.unit),
        images: Set(input.images),
        is_on_sale: Set(input.is_on_sale.unwrap_or(true)),
        service_provider_id: Set(input.service_provider_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}
