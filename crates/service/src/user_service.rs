//! Profile and address operations for the authenticated user.
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use models::{address, user, validation};

/// User with their saved addresses.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: user::Model,
    pub addresses: Vec<address::Model>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User"))
}

pub async fn profile(db: &DatabaseConnection, user_id: i32) -> Result<UserProfile, ServiceError> {
    let user = get_user(db, user_id).await?;
    let addresses = address::list_for_user(db, user_id).await?;
    Ok(UserProfile { user, addresses })
}

#[instrument(skip(db, update))]
pub async fn update_profile(db: &DatabaseConnection, user_id: i32, update: ProfileUpdate) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = get_user(db, user_id).await?.into();
    if let Some(name) = update.username {
        user::validate_username(&name)?;
        am.username = Set(name.trim().to_string());
    }
    if let Some(avatar) = update.avatar {
        am.avatar = Set(Some(avatar).filter(|a| !a.trim().is_empty()));
    }
    if let Some(phone) = update.phone {
        validation::validate_phone(&phone)?;
        let taken = user::Entity::find()
            .filter(user::Column::Phone.eq(phone.clone()))
            .filter(user::Column::Id.ne(user_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if taken.is_some() {
            return Err(ServiceError::Duplicate("Phone number already registered".into()));
        }
        am.phone = Set(Some(phone));
    }
    let updated = am.update(db).await.map_err(ServiceError::from_db)?;
    info!(user_id, "profile_updated");
    Ok(updated)
}

#[instrument(skip(db, input))]
pub async fn add_address(db: &DatabaseConnection, user_id: i32, input: address::NewAddress) -> Result<address::Model, ServiceError> {
    let created = address::create(db, user_id, input).await?;
    info!(user_id, address_id = created.id, "address_added");
    Ok(created)
}

pub async fn list_addresses(db: &DatabaseConnection, user_id: i32) -> Result<Vec<address::Model>, ServiceError> {
    Ok(address::list_for_user(db, user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user as seed_user};

    fn addr(phone: &str) -> address::NewAddress {
        address::NewAddress {
            province: "Guangdong".into(),
            city: "Shenzhen".into(),
            district: "Nanshan".into(),
            detail_address: "8 Keji Rd".into(),
            phone: phone.into(),
            name: None,
        }
    }

    #[tokio::test]
    async fn profile_includes_addresses() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = seed_user(&db, "gina").await?;
        add_address(&db, u.id, addr("13600136000")).await?;
        let err = add_address(&db, u.id, addr("999")).await.unwrap_err();
        assert_eq!(err.message(), "Invalid phone number format");

        let p = profile(&db, u.id).await?;
        assert_eq!(p.addresses.len(), 1);
        let json = serde_json::to_value(&p)?;
        assert_eq!(json["username"], "gina");
        assert!(json["addresses"].is_array());
        assert!(json.get("password_hash").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_profile_fields() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = seed_user(&db, "hank").await?;
        let other = seed_user(&db, "ivan").await?;
        update_profile(&db, other.id, ProfileUpdate { phone: Some("13500135000".into()), ..Default::default() }).await?;

        let updated = update_profile(
            &db,
            u.id,
            ProfileUpdate { username: Some("hank2".into()), avatar: Some("a.png".into()), phone: None },
        )
        .await?;
        assert_eq!(updated.username, "hank2");
        assert_eq!(updated.avatar.as_deref(), Some("a.png"));

        let dup = update_profile(&db, u.id, ProfileUpdate { phone: Some("13500135000".into()), ..Default::default() }).await;
        assert!(matches!(dup, Err(ServiceError::Duplicate(_))));
        assert!(matches!(
            update_profile(&db, 9999, ProfileUpdate::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }
}
