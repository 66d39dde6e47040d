use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{address, errors, order, service_provider, validation};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Address,
    Order,
    ServiceProvider,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Address => Entity::has_many(address::Entity).into(),
            Relation::Order => Entity::has_many(order::Entity).into(),
            Relation::ServiceProvider => Entity::has_one(service_provider::Entity).into(),
        }
    }
}

impl Related<address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
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

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().chars().count() < MIN_USERNAME_LEN {
        return Err(errors::ModelError::validation("Username must be at least 3 characters long"));
    }
    validation::max_len("username", username, 80)
}

pub fn validate_password(password: &str) -> Result<(), errors::ModelError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(errors::ModelError::validation("Password must be at least 6 characters long"));
    }
    Ok(())
}

/// Insert a user; `password_hash` must already be a PHC string.
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    phone: Option<&str>,
    password_hash: &str,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validation::validate_email(email)?;
    if let Some(p) = phone {
        validation::validate_phone(p)?;
    }
    if password_hash.is_empty() {
        return Err(errors::ModelError::validation("password hash required"));
    }
    let am = ActiveModel {
        username: Set(username.trim().to_string()),
        email: Set(email.trim().to_lowercase()),
        password_hash: Set(password_hash.to_string()),
        phone: Set(phone.map(str::to_string)),
        avatar: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}

pub async fn find_by_phone(db: &DatabaseConnection, phone: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Phone.eq(phone))
        .one(db)
        .await
        .map_err(errors::ModelError::from)
}
