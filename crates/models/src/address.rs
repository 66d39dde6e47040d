use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, user, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    pub phone: String,
    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewAddress {
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    pub phone: String,
    pub name: Option<String>,
}

pub fn validate(input: &NewAddress) -> Result<(), errors::ModelError> {
    validation::require("province", &input.province)?;
    validation::require("city", &input.city)?;
    validation::require("district", &input.district)?;
    validation::require("detail_address", &input.detail_address)?;
    validation::require("phone", &input.phone)?;
    validation::validate_phone(&input.phone)?;
    validation::max_len("detail_address", &input.detail_address, 255)
}

pub async fn create(db: &DatabaseConnection, user_id: i32, input: NewAddress) -> Result<Model, errors::ModelError> {
    validate(&input)?;
    let am = ActiveModel {
        user_id: Set(user_id),
        province: Set(input.province),
        city: Set(input.city),
        district: Set(input.district),
        detail_address: Set(input.detail_address),
        phone: Set(input.phone),
        name: Set(input.name),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

pub async fn list_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(errors::ModelError::from)
}
