use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};

use super::setup_test_db;
use crate::{
    address, coupon, errors::ModelError, faq, order, order_review, service_category, service_item,
    service_provider, user, user_coupon,
};

#[tokio::test]
async fn test_user_create_and_lookup() -> Result<()> {
    let db = setup_test_db().await?;

    let u = user::create(&db, "alice", "Alice@Example.com", Some("13800138000"), "$argon2id$stub").await?;
    assert!(u.is_active);
    assert_eq!(u.email, "alice@example.com");

    let by_email = user::find_by_email(&db, "alice@example.com").await?;
    assert_eq!(by_email.map(|m| m.id), Some(u.id));
    let by_phone = user::find_by_phone(&db, "13800138000").await?;
    assert_eq!(by_phone.map(|m| m.id), Some(u.id));

    // password hash never leaves the model through serde
    let json = serde_json::to_value(&u)?;
    assert!(json.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn test_user_validation_and_uniqueness() -> Result<()> {
    let db = setup_test_db().await?;

    assert!(matches!(user::create(&db, "al", "al@example.com", None, "h").await, Err(ModelError::Validation(_))));
    assert!(matches!(user::create(&db, "alice", "not-an-email", None, "h").await, Err(ModelError::Validation(_))));
    assert!(matches!(
        user::create(&db, "alice", "alice@example.com", Some("12345"), "h").await,
        Err(ModelError::Validation(_))
    ));

    user::create(&db, "alice", "alice@example.com", None, "h").await?;
    let dup = user::create(&db, "alice2", "alice@example.com", None, "h").await;
    assert!(matches!(dup, Err(ModelError::Duplicate(_))));
    Ok(())
}

#[tokio::test]
async fn test_address_belongs_to_user() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "bob", "bob@example.com", None, "h").await?;

    let input = address::NewAddress {
        province: "Zhejiang".into(),
        city: "Hangzhou".into(),
        district: "Xihu".into(),
        detail_address: "1 Lake Road".into(),
        phone: "13900139000".into(),
        name: Some("Bob".into()),
    };
    let a = address::create(&db, u.id, input.clone()).await?;
    assert_eq!(a.user_id, u.id);

    let bad = address::NewAddress { phone: "555".into(), ..input };
    assert!(address::create(&db, u.id, bad).await.is_err());

    let listed = address::list_for_user(&db, u.id).await?;
    assert_eq!(listed.len(), 1);
    let owned = u.find_related(address::Entity).all(&db).await?;
    assert_eq!(owned.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_category_tree_and_items() -> Result<()> {
    let db = setup_test_db().await?;
    let root = service_category::create(&db, "Cleaning", None, None).await?;
    let child = service_category::create(&db, "Deep cleaning", Some(root.id), Some("broom.png")).await?;
    assert!(service_category::create(&db, "Orphan", Some(9999), None).await.is_err());

    let tree = service_category::build_tree(&service_category::list_all(&db).await?);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children[0].id, child.id);

    let item = service_item::create(
        &db,
        service_item::NewServiceItem {
            category_id: child.id,
            title: "Kitchen deep clean".into(),
            price_cents: 19_900,
            unit: Some("session".into()),
            ..Default::default()
        },
    )
    .await?;
    assert!(item.is_on_sale);

    let missing_category = service_item::create(
        &db,
        service_item::NewServiceItem {
            category_id: 4242,
            title: "x".into(),
            unit: Some("visit".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(missing_category, Err(ModelError::Validation(_))));

    let (_, cat) = service_item::Entity::find_by_id(item.id)
        .find_also_related(service_category::Entity)
        .one(&db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("item missing"))?;
    assert_eq!(cat.map(|c| c.name), Some("Deep cleaning".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_provider_profile_and_review_outcome() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "carol", "carol@example.com", None, "h").await?;
    let p = service_provider::create(
        &db,
        u.id,
        service_provider::NewProvider {
            real_name: "Carol Chen".into(),
            id_card: "110101199003071234".into(),
            phone: "13700137000".into(),
            address: Some("Xicheng".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(p.status, service_provider::ProviderStatus::Pending);
    assert!(!p.is_verified);

    // one profile per user
    let again = service_provider::create(
        &db,
        u.id,
        service_provider::NewProvider {
            real_name: "Carol".into(),
            id_card: "110101199003079999".into(),
            phone: "13700137000".into(),
            address: Some("Xicheng".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(again.is_err());

    let approved = service_provider::set_review_outcome(&db, p.id, true).await?;
    assert_eq!(approved.status, service_provider::ProviderStatus::Approved);
    assert!(approved.is_verified);
    let rejected = service_provider::set_review_outcome(&db, p.id, false).await?;
    assert_eq!(rejected.status, service_provider::ProviderStatus::Rejected);
    assert!(!rejected.is_verified);
    Ok(())
}

#[tokio::test]
async fn test_order_lifecycle_and_review() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "dave", "dave@example.com", None, "h").await?;
    let cat = service_category::create(&db, "Repairs", None, None).await?;
    let item = service_item::create(
        &db,
        service_item::NewServiceItem {
            category_id: cat.id,
            title: "Fix tap".into(),
            price_cents: 5_000,
            unit: Some("visit".into()),
            ..Default::default()
        },
    )
    .await?;

    let o = order::create(
        &db,
        order::NewOrder {
            user_id: u.id,
            service_item_id: item.id,
            service_provider_id: None,
            user_coupon_id: None,
            total_amount_cents: item.price_cents,
            discount_cents: 0,
            appointment_time: (Utc::now() + Duration::days(1)).into(),
            address: "2 River St".into(),
            remark: None,
        },
    )
    .await?;
    assert_eq!(o.status, order::OrderStatus::Pending);
    assert!(o.order_no.len() >= 22);

    // pending cannot jump to completed
    assert!(order::transition(&db, o.clone(), order::OrderStatus::Completed).await.is_err());

    let paid = order::mark_paid(&db, o, "alipay").await?;
    assert_eq!(paid.status, order::OrderStatus::Paid);
    assert_eq!(paid.paid_amount_cents, Some(5_000));
    assert!(paid.paid_at.is_some());
    assert!(order::mark_paid(&db, paid.clone(), "alipay").await.is_err());

    let done = order::transition(&db, paid, order::OrderStatus::Completed).await?;
    assert!(order_review::create(&db, &done, 6, "great", None).await.is_err());
    let r = order_review::create(&db, &done, 5, "great", None).await?;
    assert_eq!(r.order_id, done.id);
    // one review per order
    assert!(order_review::create(&db, &done, 4, "again", None).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_coupon_claims_are_unique_per_user() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "erin", "erin@example.com", None, "h").await?;
    let c = coupon::create(
        &db,
        coupon::NewCoupon {
            code: "WELCOME10".into(),
            discount_type: coupon::DiscountType::Percentage,
            discount_value: 10,
            start_date: (Utc::now() - Duration::days(1)).into(),
            end_date: (Utc::now() + Duration::days(30)).into(),
            is_active: None,
            min_spend_cents: None,
            max_discount_cents: None,
            usage_limit: None,
        },
    )
    .await?;
    assert!(c.is_active);
    assert_eq!(coupon::find_by_code(&db, "WELCOME10").await?.map(|m| m.id), Some(c.id));

    let claim = user_coupon::create(&db, u.id, c.id).await?;
    assert!(claim.used_at.is_none());
    assert!(user_coupon::create(&db, u.id, c.id).await.is_err());

    assert!(user_coupon::mark_used(&db, claim.id).await?);
    // a second redemption of the same claim must not win
    assert!(!user_coupon::mark_used(&db, claim.id).await?);
    let used = user_coupon::find_claim(&db, u.id, c.id).await?;
    assert!(used.and_then(|m| m.used_at).is_some());

    assert!(user_coupon::clear_used(&db, claim.id).await?);
    let released = user_coupon::find_claim(&db, u.id, c.id).await?;
    assert!(released.map(|m| m.used_at.is_none()).unwrap_or(false));
    assert!(user_coupon::mark_used(&db, claim.id).await?);
    assert!(!user_coupon::clear_used(&db, 4242).await?);
    Ok(())
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() -> Result<()> {
    let db = setup_test_db().await?;
    let orphan = user_coupon::create(&db, 4242, 4242).await;
    assert!(matches!(orphan, Err(ModelError::Validation(_))));
    assert_eq!(user_coupon::Entity::find().all(&db).await?.len(), 0);
    Ok(())
}

#[tokio::test]
async fn test_faq_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let f = faq::create(&db, "How do I pay?", "Through the payment link on your order.").await?;
    assert!(faq::create(&db, " ", "answer").await.is_err());

    let mut am: faq::ActiveModel = f.into();
    am.answer = Set("Use the pay link.".into());
    let updated = am.update(&db).await?;
    assert_eq!(updated.answer, "Use the pay link.");

    faq::Entity::delete_by_id(updated.id).exec(&db).await?;
    assert!(faq::Entity::find_by_id(updated.id).one(&db).await?.is_none());
    Ok(())
}
