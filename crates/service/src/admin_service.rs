//! Admin console operations over every marketplace entity.
//!
//! Listing, fetching and deleting are generic over [`AdminResource`]; create
//! and update bodies are parsed into typed inputs per resource.
use std::str::FromStr;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{coupon_service, errors::ServiceError, order_service, paging};
use common::pagination::Pagination;
use common::types::Page;
use models::order::OrderStatus;
use models::service_provider::ProviderStatus;
use models::{
    coupon, faq, order, order_review, service_category, service_item, service_provider, user, user_coupon,
    validation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminResource {
    Users,
    Categories,
    Items,
    Providers,
    Orders,
    Reviews,
    Coupons,
    UserCoupons,
    Faqs,
}

impl AdminResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminResource::Users => "users",
            AdminResource::Categories => "categories",
            AdminResource::Items => "items",
            AdminResource::Providers => "providers",
            AdminResource::Orders => "orders",
            AdminResource::Reviews => "reviews",
            AdminResource::Coupons => "coupons",
            AdminResource::UserCoupons => "user-coupons",
            AdminResource::Faqs => "faqs",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AdminResource::Users => "User",
            AdminResource::Categories => "Service category",
            AdminResource::Items => "Service item",
            AdminResource::Providers => "Service provider",
            AdminResource::Orders => "Order",
            AdminResource::Reviews => "Review",
            AdminResource::Coupons => "Coupon",
            AdminResource::UserCoupons => "User coupon",
            AdminResource::Faqs => "FAQ",
        }
    }
}

impl FromStr for AdminResource {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(AdminResource::Users),
            "categories" => Ok(AdminResource::Categories),
            "items" => Ok(AdminResource::Items),
            "providers" => Ok(AdminResource::Providers),
            "orders" => Ok(AdminResource::Orders),
            "reviews" => Ok(AdminResource::Reviews),
            "coupons" => Ok(AdminResource::Coupons),
            "user-coupons" => Ok(AdminResource::UserCoupons),
            "faqs" => Ok(AdminResource::Faqs),
            other => Err(ServiceError::NotFound(format!("Unknown admin resource: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Approve,
    Reject,
    Complete,
    Cancel,
}

impl FromStr for AdminAction {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(AdminAction::Approve),
            "reject" => Ok(AdminAction::Reject),
            "complete" => Ok(AdminAction::Complete),
            "cancel" => Ok(AdminAction::Cancel),
            other => Err(ServiceError::NotFound(format!("Unknown admin action: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Dashboard {
    pub users: u64,
    pub providers: u64,
    pub pending_providers: u64,
    pub service_items: u64,
    pub orders: u64,
    pub pending_orders: u64,
    pub paid_orders: u64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
    pub reviews: u64,
    pub coupons: u64,
    pub faqs: u64,
}

/// Missing stays `None`; an explicit `null` becomes `Some(None)`.
fn double_option<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub parent_id: Option<i32>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    pub category_id: Option<i32>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub unit: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub images: Option<Option<String>>,
    pub is_on_sale: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub service_provider_id: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CouponUpdate {
    pub discount_type: Option<coupon::DiscountType>,
    pub discount_value: Option<i64>,
    pub start_date: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub end_date: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub min_spend_cents: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_discount_cents: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub usage_limit: Option<Option<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderUpdate {
    pub status: Option<ProviderStatus>,
    pub is_verified: Option<bool>,
    pub real_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub experience: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub certificates: Option<Option<String>>,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T, ServiceError> {
    serde_json::from_value(body).map_err(|e| ServiceError::Validation(format!("Invalid request body: {e}")))
}

fn to_value<T: Serialize>(v: T) -> Result<Value, ServiceError> {
    serde_json::to_value(v).map_err(|e| ServiceError::Db(e.to_string()))
}

fn values<T: Serialize>(page: Page<T>) -> Result<Page<Value>, ServiceError> {
    let items = page.items.into_iter().map(to_value).collect::<Result<Vec<_>, _>>()?;
    Ok(Page { items, page: page.page, per_page: page.per_page, total: page.total })
}

async fn find<E>(db: &DatabaseConnection, id: i32, what: &str) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::NotFound(format!("{what} not found")))
}

async fn count<E: EntityTrait>(db: &DatabaseConnection, query: sea_orm::Select<E>) -> Result<u64, ServiceError>
where
    E::Model: Sync,
{
    query.count(db).await.map_err(db_err)
}

pub async fn dashboard(db: &DatabaseConnection) -> Result<Dashboard, ServiceError> {
    let orders_with = |s: OrderStatus| order::Entity::find().filter(order::Column::Status.eq(s));
    Ok(Dashboard {
        users: count(db, user::Entity::find()).await?,
        providers: count(db, service_provider::Entity::find()).await?,
        pending_providers: count(
            db,
            service_provider::Entity::find().filter(service_provider::Column::Status.eq(ProviderStatus::Pending)),
        )
        .await?,
        service_items: count(db, service_item::Entity::find()).await?,
        orders: count(db, order::Entity::find()).await?,
        pending_orders: count(db, orders_with(OrderStatus::Pending)).await?,
        paid_orders: count(db, orders_with(OrderStatus::Paid)).await?,
        completed_orders: count(db, orders_with(OrderStatus::Completed)).await?,
        cancelled_orders: count(db, orders_with(OrderStatus::Cancelled)).await?,
        reviews: count(db, order_review::Entity::find()).await?,
        coupons: count(db, coupon::Entity::find()).await?,
        faqs: count(db, faq::Entity::find()).await?,
    })
}

pub async fn list(db: &DatabaseConnection, res: AdminResource, opts: Pagination) -> Result<Page<Value>, ServiceError> {
    match res {
        AdminResource::Users => {
            values(paging::fetch_page(db, user::Entity::find().order_by_asc(user::Column::Id), opts).await?)
        }
        AdminResource::Categories => values(
            paging::fetch_page(db, service_category::Entity::find().order_by_asc(service_category::Column::Id), opts)
                .await?,
        ),
        AdminResource::Items => values(
            paging::fetch_page(db, service_item::Entity::find().order_by_asc(service_item::Column::Id), opts).await?,
        ),
        AdminResource::Providers => values(
            paging::fetch_page(db, service_provider::Entity::find().order_by_asc(service_provider::Column::Id), opts)
                .await?,
        ),
        AdminResource::Orders => {
            values(paging::fetch_page(db, order::Entity::find().order_by_desc(order::Column::Id), opts).await?)
        }
        AdminResource::Reviews => values(
            paging::fetch_page(db, order_review::Entity::find().order_by_desc(order_review::Column::Id), opts).await?,
        ),
        AdminResource::Coupons => {
            values(paging::fetch_page(db, coupon::Entity::find().order_by_asc(coupon::Column::Id), opts).await?)
        }
        AdminResource::UserCoupons => values(
            paging::fetch_page(db, user_coupon::Entity::find().order_by_desc(user_coupon::Column::Id), opts).await?,
        ),
        AdminResource::Faqs => {
            values(paging::fetch_page(db, faq::Entity::find().order_by_asc(faq::Column::Id), opts).await?)
        }
    }
}

pub async fn get(db: &DatabaseConnection, res: AdminResource, id: i32) -> Result<Value, ServiceError> {
    let what = res.label();
    match res {
        AdminResource::Users => to_value(find::<user::Entity>(db, id, what).await?),
        AdminResource::Categories => to_value(find::<service_category::Entity>(db, id, what).await?),
        AdminResource::Items => to_value(find::<service_item::Entity>(db, id, what).await?),
        AdminResource::Providers => to_value(find::<service_provider::Entity>(db, id, what).await?),
        AdminResource::Orders => to_value(find::<order::Entity>(db, id, what).await?),
        AdminResource::Reviews => to_value(find::<order_review::Entity>(db, id, what).await?),
        AdminResource::Coupons => to_value(find::<coupon::Entity>(db, id, what).await?),
        AdminResource::UserCoupons => to_value(find::<user_coupon::Entity>(db, id, what).await?),
        AdminResource::Faqs => to_value(find::<faq::Entity>(db, id, what).await?),
    }
}

/// Hard delete. Rows still referenced elsewhere (e.g. a user with orders) are refused.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, res: AdminResource, id: i32) -> Result<(), ServiceError> {
    let result = match res {
        AdminResource::Users => user::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Categories => service_category::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Items => service_item::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Providers => service_provider::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Orders => order::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Reviews => order_review::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Coupons => coupon::Entity::delete_by_id(id).exec(db).await,
        AdminResource::UserCoupons => user_coupon::Entity::delete_by_id(id).exec(db).await,
        AdminResource::Faqs => faq::Entity::delete_by_id(id).exec(db).await,
    }
    .map_err(ServiceError::from_db)?;
    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("{} not found", res.label())));
    }
    info!(resource = res.as_str(), id, "admin_deleted");
    Ok(())
}

pub async fn create(db: &DatabaseConnection, res: AdminResource, body: Value) -> Result<Value, ServiceError> {
    match res {
        AdminResource::Categories => to_value(create_category(db, parse(body)?).await?),
        AdminResource::Items => to_value(create_item(db, parse(body)?).await?),
        AdminResource::Coupons => to_value(coupon_service::create_coupon(db, parse(body)?).await?),
        AdminResource::Faqs => to_value(create_faq(db, parse(body)?).await?),
        other => Err(ServiceError::Validation(format!("{} cannot be created from the admin console", other.as_str()))),
    }
}

pub async fn update(db: &DatabaseConnection, res: AdminResource, id: i32, body: Value) -> Result<Value, ServiceError> {
    match res {
        AdminResource::Users => to_value(update_user(db, id, parse(body)?).await?),
        AdminResource::Categories => to_value(update_category(db, id, parse(body)?).await?),
        AdminResource::Items => to_value(update_item(db, id, parse(body)?).await?),
        AdminResource::Providers => to_value(update_provider(db, id, parse(body)?).await?),
        AdminResource::Coupons => to_value(update_coupon(db, id, parse(body)?).await?),
        AdminResource::Faqs => to_value(update_faq(db, id, parse(body)?).await?),
        other => Err(ServiceError::Validation(format!("{} cannot be edited from the admin console", other.as_str()))),
    }
}

pub async fn perform(db: &DatabaseConnection, res: AdminResource, id: i32, action: AdminAction) -> Result<Value, ServiceError> {
    match (res, action) {
        (AdminResource::Providers, AdminAction::Approve) => to_value(review_provider(db, id, true).await?),
        (AdminResource::Providers, AdminAction::Reject) => to_value(review_provider(db, id, false).await?),
        (AdminResource::Orders, AdminAction::Complete) => to_value(complete_order(db, id).await?),
        (AdminResource::Orders, AdminAction::Cancel) => to_value(cancel_order(db, id).await?),
        _ => Err(ServiceError::Validation(format!("Action not supported for {}", res.as_str()))),
    }
}

pub async fn create_category(db: &DatabaseConnection, input: CategoryInput) -> Result<service_category::Model, ServiceError> {
    let exists = service_category::Entity::find()
        .filter(service_category::Column::Name.eq(input.name.trim()))
        .one(db)
        .await
        .map_err(db_err)?;
    if exists.is_some() {
        return Err(ServiceError::Duplicate("Category name already exists".into()));
    }
    Ok(service_category::create(db, &input.name, input.parent_id, input.icon.as_deref()).await?)
}

/// Reject a parent that is the category itself or one of its descendants.
async fn check_parent(db: &DatabaseConnection, id: i32, parent_id: i32) -> Result<(), ServiceError> {
    let all = service_category::list_all(db).await?;
    let mut cursor = Some(parent_id);
    let mut hops = 0;
    while let Some(current) = cursor {
        if current == id {
            return Err(ServiceError::Validation("Category cannot be its own ancestor".into()));
        }
        let node = all
            .iter()
            .find(|c| c.id == current)
            .ok_or_else(|| ServiceError::Validation("Parent category not found".into()))?;
        cursor = node.parent_id;
        hops += 1;
        if hops > all.len() {
            break;
        }
    }
    Ok(())
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: i32,
    update: CategoryUpdate,
) -> Result<service_category::Model, ServiceError> {
    let mut am: service_category::ActiveModel = find::<service_category::Entity>(db, id, "Service category").await?.into();
    if let Some(name) = update.name {
        service_category::validate_name(&name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(parent) = update.parent_id {
        if let Some(pid) = parent {
            check_parent(db, id, pid).await?;
        }
        am.parent_id = Set(parent);
    }
    if let Some(icon) = update.icon {
        am.icon = Set(icon);
    }
    am.update(db).await.map_err(ServiceError::from_db)
}

pub async fn create_item(db: &DatabaseConnection, input: service_item::NewServiceItem) -> Result<service_item::Model, ServiceError> {
    if let Some(pid) = input.service_provider_id {
        find::<service_provider::Entity>(db, pid, "Service provider").await?;
    }
    Ok(service_item::create(db, input).await?)
}

pub async fn update_item(db: &DatabaseConnection, id: i32, update: ItemUpdate) -> Result<service_item::Model, ServiceError> {
    let mut am: service_item::ActiveModel = find::<service_item::Entity>(db, id, "Service item").await?.into();
    if let Some(cid) = update.category_id {
        find::<service_category::Entity>(db, cid, "Service category").await?;
        am.category_id = Set(cid);
    }
    if let Some(title) = update.title {
        service_item::validate_title(&title)?;
        am.title = Set(title.trim().to_string());
    }
    if let Some(description) = update.description {
        am.description = Set(description);
    }
    if let Some(price) = update.price_cents {
        service_item::validate_price(price)?;
        am.price_cents = Set(price);
    }
    if let Some(unit) = update.unit {
        am.unit = Set(unit);
    }
    if let Some(images) = update.images {
        am.images = Set(images);
    }
    if let Some(on_sale) = update.is_on_sale {
        am.is_on_sale = Set(on_sale);
    }
    if let Some(provider) = update.service_provider_id {
        if let Some(pid) = provider {
            find::<service_provider::Entity>(db, pid, "Service provider").await?;
        }
        am.service_provider_id = Set(provider);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(ServiceError::from_db)
}

pub async fn update_coupon(db: &DatabaseConnection, id: i32, update: CouponUpdate) -> Result<coupon::Model, ServiceError> {
    let current = find::<coupon::Entity>(db, id, "Coupon").await?;
    let discount_type = update.discount_type.unwrap_or(current.discount_type);
    let discount_value = update.discount_value.unwrap_or(current.discount_value);
    let start_date = update.start_date.unwrap_or(current.start_date);
    let end_date = update.end_date.unwrap_or(current.end_date);
    coupon::validate_terms(discount_type, discount_value, start_date, end_date)?;

    let mut am: coupon::ActiveModel = current.into();
    am.discount_type = Set(discount_type);
    am.discount_value = Set(discount_value);
    am.start_date = Set(start_date);
    am.end_date = Set(end_date);
    if let Some(active) = update.is_active {
        am.is_active = Set(active);
    }
    if let Some(min) = update.min_spend_cents {
        if matches!(min, Some(v) if v < 0) {
            return Err(ServiceError::Validation("min_spend must not be negative".into()));
        }
        am.min_spend_cents = Set(min);
    }
    if let Some(max) = update.max_discount_cents {
        if matches!(max, Some(v) if v <= 0) {
            return Err(ServiceError::Validation("max_discount must be positive".into()));
        }
        am.max_discount_cents = Set(max);
    }
    if let Some(limit) = update.usage_limit {
        if matches!(limit, Some(v) if v <= 0) {
            return Err(ServiceError::Validation("usage_limit must be positive".into()));
        }
        am.usage_limit = Set(limit);
    }
    am.update(db).await.map_err(ServiceError::from_db)
}

pub async fn create_faq(db: &DatabaseConnection, input: FaqInput) -> Result<faq::Model, ServiceError> {
    Ok(faq::create(db, &input.question, &input.answer).await?)
}

pub async fn update_faq(db: &DatabaseConnection, id: i32, update: FaqUpdate) -> Result<faq::Model, ServiceError> {
    let current = find::<faq::Entity>(db, id, "FAQ").await?;
    let question = update.question.unwrap_or_else(|| current.question.clone());
    let answer = update.answer.unwrap_or_else(|| current.answer.clone());
    faq::validate(&question, &answer)?;
    let mut am: faq::ActiveModel = current.into();
    am.question = Set(question.trim().to_string());
    am.answer = Set(answer);
    am.update(db).await.map_err(ServiceError::from_db)
}

pub async fn update_user(db: &DatabaseConnection, id: i32, update: UserUpdate) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = find::<user::Entity>(db, id, "User").await?.into();
    if let Some(name) = update.username {
        user::validate_username(&name)?;
        am.username = Set(name.trim().to_string());
    }
    if let Some(active) = update.is_active {
        am.is_active = Set(active);
    }
    if let Some(avatar) = update.avatar {
        am.avatar = Set(avatar);
    }
    let updated = am.update(db).await.map_err(ServiceError::from_db)?;
    info!(user_id = id, is_active = updated.is_active, "admin_user_updated");
    Ok(updated)
}

pub async fn update_provider(
    db: &DatabaseConnection,
    id: i32,
    update: ProviderUpdate,
) -> Result<service_provider::Model, ServiceError> {
    let mut am: service_provider::ActiveModel = find::<service_provider::Entity>(db, id, "Service provider").await?.into();
    if let Some(status) = update.status {
        am.status = Set(status);
    }
    if let Some(verified) = update.is_verified {
        am.is_verified = Set(verified);
    }
    if let Some(name) = update.real_name {
        validation::require("real_name", &name)?;
        am.real_name = Set(name.trim().to_string());
    }
    if let Some(phone) = update.phone {
        validation::validate_phone(&phone)?;
        am.phone = Set(phone);
    }
    if let Some(address) = update.address {
        am.address = Set(address);
    }
    if let Some(experience) = update.experience {
        am.experience = Set(experience);
    }
    if let Some(certificates) = update.certificates {
        am.certificates = Set(certificates);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(ServiceError::from_db)
}

#[instrument(skip(db))]
pub async fn review_provider(db: &DatabaseConnection, id: i32, approve: bool) -> Result<service_provider::Model, ServiceError> {
    find::<service_provider::Entity>(db, id, "Service provider").await?;
    let reviewed = service_provider::set_review_outcome(db, id, approve).await?;
    info!(provider_id = id, approve, "provider_reviewed");
    Ok(reviewed)
}

/// Manual `paid -> completed`.
#[instrument(skip(db))]
pub async fn complete_order(db: &DatabaseConnection, id: i32) -> Result<order::Model, ServiceError> {
    let found = find::<order::Entity>(db, id, "Order").await?;
    if found.status != OrderStatus::Paid {
        return Err(ServiceError::Validation("Only paid orders can be completed".into()));
    }
    let done = order::transition(db, found, OrderStatus::Completed).await?;
    info!(order_id = id, "admin_order_completed");
    Ok(done)
}

/// Cancel a pending or paid order; refunds are settled outside the system.
#[instrument(skip(db))]
pub async fn cancel_order(db: &DatabaseConnection, id: i32) -> Result<order::Model, ServiceError> {
    let found = find::<order::Entity>(db, id, "Order").await?;
    if !matches!(found.status, OrderStatus::Pending | OrderStatus::Paid) {
        return Err(ServiceError::Validation("Only pending or paid orders can be cancelled".into()));
    }
    order_service::cancel_and_release(db, found).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_service::{create_order, CreateOrderInput};
    use crate::test_support::{get_db, item, provider_input, user as seed_user};
    use chrono::Duration;
    use serde_json::json;

    async fn pending_order(db: &DatabaseConnection) -> Result<order::Model, anyhow::Error> {
        let u = seed_user(db, "yara").await?;
        let it = item(db, 3_000, None).await?;
        Ok(create_order(
            db,
            u.id,
            CreateOrderInput {
                service_item_id: it.id,
                appointment_time: (Utc::now() + Duration::days(1)).into(),
                address: "9 Bay St".into(),
                remark: None,
                coupon_code: None,
            },
        )
        .await?)
    }

    #[test]
    fn resource_and_action_names() {
        assert_eq!("user-coupons".parse::<AdminResource>().ok(), Some(AdminResource::UserCoupons));
        assert!("widgets".parse::<AdminResource>().is_err());
        assert_eq!("approve".parse::<AdminAction>().ok(), Some(AdminAction::Approve));
        assert!("explode".parse::<AdminAction>().is_err());
    }

    #[test]
    fn double_option_distinguishes_null_from_missing() {
        let missing: CategoryUpdate = serde_json::from_value(json!({})).expect("parse");
        assert_eq!(missing.parent_id, None);
        let null: CategoryUpdate = serde_json::from_value(json!({"parent_id": null})).expect("parse");
        assert_eq!(null.parent_id, Some(None));
        let set: CategoryUpdate = serde_json::from_value(json!({"parent_id": 3})).expect("parse");
        assert_eq!(set.parent_id, Some(Some(3)));
    }

    #[tokio::test]
    async fn generic_crud_over_faqs_and_categories() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create(&db, AdminResource::Faqs, json!({"question": "Q1?", "answer": "A1"})).await?;
        let id = created["id"].as_i64().unwrap_or_default() as i32;
        let updated = update(&db, AdminResource::Faqs, id, json!({"answer": "A1b"})).await?;
        assert_eq!(updated["answer"], "A1b");
        assert_eq!(get(&db, AdminResource::Faqs, id).await?["question"], "Q1?");

        let page = list(&db, AdminResource::Faqs, Pagination::default()).await?;
        assert_eq!(page.total, 1);

        delete(&db, AdminResource::Faqs, id).await?;
        assert!(matches!(get(&db, AdminResource::Faqs, id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete(&db, AdminResource::Faqs, id).await, Err(ServiceError::NotFound(_))));

        let bad = create(&db, AdminResource::Faqs, json!({"question": "no answer"})).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        let unsupported = create(&db, AdminResource::Orders, json!({})).await;
        assert!(matches!(unsupported, Err(ServiceError::Validation(_))));

        let root = create(&db, AdminResource::Categories, json!({"name": "Root"})).await?;
        let root_id = root["id"].as_i64().unwrap_or_default() as i32;
        let child = create(&db, AdminResource::Categories, json!({"name": "Child", "parent_id": root_id})).await?;
        let child_id = child["id"].as_i64().unwrap_or_default() as i32;
        let dup = create(&db, AdminResource::Categories, json!({"name": "Root"})).await;
        assert!(matches!(dup, Err(ServiceError::Duplicate(_))));
        let cycle = update(&db, AdminResource::Categories, root_id, json!({"parent_id": child_id})).await;
        assert!(matches!(cycle, Err(ServiceError::Validation(_))));
        let detached = update(&db, AdminResource::Categories, child_id, json!({"parent_id": null})).await?;
        assert!(detached["parent_id"].is_null());
        Ok(())
    }

    #[tokio::test]
    async fn referenced_rows_cannot_be_deleted() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let o = pending_order(&db).await?;
        let err = delete(&db, AdminResource::Users, o.user_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        delete(&db, AdminResource::Orders, o.id).await?;
        delete(&db, AdminResource::Users, o.user_id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn order_actions_follow_lifecycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let o = pending_order(&db).await?;

        let early = perform(&db, AdminResource::Orders, o.id, AdminAction::Complete).await.unwrap_err();
        assert_eq!(early.message(), "Only paid orders can be completed");

        order::mark_paid(&db, o.clone(), "card").await?;
        let done = perform(&db, AdminResource::Orders, o.id, AdminAction::Complete).await?;
        assert_eq!(done["status"], "completed");
        let late = perform(&db, AdminResource::Orders, o.id, AdminAction::Cancel).await.unwrap_err();
        assert_eq!(late.message(), "Only pending or paid orders can be cancelled");

        let other = pending_order_for(&db, "zack").await?;
        order::mark_paid(&db, other.clone(), "card").await?;
        let cancelled = perform(&db, AdminResource::Orders, other.id, AdminAction::Cancel).await?;
        assert_eq!(cancelled["status"], "cancelled");

        let wrong = perform(&db, AdminResource::Faqs, 1, AdminAction::Approve).await;
        assert!(matches!(wrong, Err(ServiceError::Validation(_))));
        Ok(())
    }

    async fn pending_order_for(db: &DatabaseConnection, name: &str) -> Result<order::Model, anyhow::Error> {
        let u = seed_user(db, name).await?;
        let it = item(db, 4_000, None).await?;
        Ok(create_order(
            db,
            u.id,
            CreateOrderInput {
                service_item_id: it.id,
                appointment_time: (Utc::now() + Duration::days(1)).into(),
                address: "10 Bay St".into(),
                remark: None,
                coupon_code: None,
            },
        )
        .await?)
    }

    #[tokio::test]
    async fn provider_review_users_and_dashboard() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = seed_user(&db, "abby").await?;
        let p = service_provider::create(&db, u.id, provider_input("110101197001010000")).await?;

        let approved = perform(&db, AdminResource::Providers, p.id, AdminAction::Approve).await?;
        assert_eq!(approved["status"], "approved");
        assert_eq!(approved["is_verified"], true);
        let updated = update(&db, AdminResource::Providers, p.id, json!({"status": "rejected", "is_verified": false})).await?;
        assert_eq!(updated["status"], "rejected");

        let deactivated = update(&db, AdminResource::Users, u.id, json!({"is_active": false, "avatar": "x.png"})).await?;
        assert_eq!(deactivated["is_active"], false);
        assert_eq!(deactivated["avatar"], "x.png");

        let coupon = create(
            &db,
            AdminResource::Coupons,
            json!({
                "code": "ADMIN5",
                "discount_type": "fixed",
                "discount_value": 500,
                "start_date": "2025-01-01T00:00:00Z",
                "end_date": "2035-01-01T00:00:00Z"
            }),
        )
        .await?;
        let cid = coupon["id"].as_i64().unwrap_or_default() as i32;
        let bad_terms = update(&db, AdminResource::Coupons, cid, json!({"discount_type": "percentage", "discount_value": 500})).await;
        assert!(matches!(bad_terms, Err(ServiceError::Model(_))));
        let off = update(&db, AdminResource::Coupons, cid, json!({"is_active": false})).await?;
        assert_eq!(off["is_active"], false);

        pending_order(&db).await?;
        let d = dashboard(&db).await?;
        assert_eq!(d.users, 2);
        assert_eq!(d.providers, 1);
        assert_eq!(d.pending_providers, 0);
        assert_eq!(d.orders, 1);
        assert_eq!(d.pending_orders, 1);
        assert_eq!(d.coupons, 1);
        Ok(())
    }
}
