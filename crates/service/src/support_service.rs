use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::errors::ServiceError;
use models::faq;

/// All FAQ entries in creation order.
pub async fn list_faq(db: &DatabaseConnection) -> Result<Vec<faq::Model>, ServiceError> {
    faq::Entity::find()
        .order_by_asc(faq::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
