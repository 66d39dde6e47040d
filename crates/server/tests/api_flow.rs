mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{build_app, send, signup, ADMIN_EMAIL};

#[tokio::test]
async fn health_and_openapi_are_public() -> anyhow::Result<()> {
    let (app, _db) = build_app().await?;
    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/orders"].is_object());
    Ok(())
}

#[tokio::test]
async fn register_login_and_profile() -> anyhow::Result<()> {
    let (app, _db) = build_app().await?;
    let token = signup(&app, "alice", "alice@example.com", Some("13800138000")).await?;

    let dup = json!({"username": "alice2", "email": "alice@example.com", "password": "secret123"});
    let (status, body) = send(&app, "POST", "/users/register", None, Some(dup)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    let dup_phone = json!({"username": "alice3", "email": "a3@example.com", "phone": "13800138000", "password": "secret123"});
    let (_, body) = send(&app, "POST", "/users/register", None, Some(dup_phone)).await?;
    assert_eq!(body["message"], "Phone number already registered");

    let dup_name = json!({"username": "alice", "email": "other@example.com", "password": "secret123"});
    let (status, body) = send(&app, "POST", "/users/register", None, Some(dup_name)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already taken");

    let short = json!({"username": "bob", "email": "bob@example.com", "password": "123"});
    let (status, body) = send(&app, "POST", "/users/register", None, Some(short)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 6 characters long");

    let (status, _) = send(&app, "POST", "/users/register", None, Some(json!({"email": "x@example.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(&app, "POST", "/users/register", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No input data provided");

    let bad_login = json!({"email": "alice@example.com", "password": "wrong-pass"});
    let (status, body) = send(&app, "POST", "/users/login", None, Some(bad_login)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = send(&app, "GET", "/users/profile", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/users/profile", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let addr = json!({"province": "Guangdong", "city": "Shenzhen", "district": "Nanshan", "detail_address": "8 Keji Rd", "phone": "13900139000"});
    let (status, created) = send(&app, "POST", "/users/address", Some(&token), Some(addr)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["city"], "Shenzhen");
    let bad_addr = json!({"province": "P", "city": "C", "district": "D", "detail_address": "X", "phone": "12345"});
    let (status, body) = send(&app, "POST", "/users/address", Some(&token), Some(bad_addr)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid phone number format");

    let (status, profile) = send(&app, "GET", "/users/profile", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "alice@example.com");
    assert!(profile.get("password_hash").is_none());
    assert_eq!(profile["addresses"].as_array().map(Vec::len), Some(1));

    let (status, updated) = send(&app, "PUT", "/users/profile", Some(&token), Some(json!({"avatar": "a.png"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["avatar"], "a.png");

    let wrong = json!({"old_password": "nope-nope", "new_password": "another1"});
    let (status, _) = send(&app, "POST", "/users/password", Some(&token), Some(wrong)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let ok = json!({"old_password": "secret123", "new_password": "another1"});
    let (status, _) = send(&app, "POST", "/users/password", Some(&token), Some(ok)).await?;
    assert_eq!(status, StatusCode::OK);
    let relogin = json!({"email": "alice@example.com", "password": "another1"});
    let (status, _) = send(&app, "POST", "/users/login", None, Some(relogin)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn order_lifecycle_with_coupon_payment_and_review() -> anyhow::Result<()> {
    let (app, db) = build_app().await?;
    let category = models::service_category::create(&db, "Cleaning", None, None).await?;

    let provider_token = signup(&app, "pat", "pat@example.com", None).await?;
    let customer_token = signup(&app, "cara", "cara@example.com", None).await?;
    let admin_token = signup(&app, "root", ADMIN_EMAIL, None).await?;

    let item_body = json!({"category_id": category.id, "title": "Deep clean", "price_cents": 10_000, "unit": "visit"});
    let (status, body) = send(&app, "POST", "/services/items", Some(&customer_token), Some(item_body.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only service providers can add service items");

    let no_address = json!({"real_name": "Pat Lee", "id_card": "110101199001011234", "phone": "13700137000"});
    let (status, body) = send(&app, "POST", "/services/providers/register", Some(&provider_token), Some(no_address)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required field: address");

    let provider_body = json!({"real_name": "Pat Lee", "id_card": "110101199001011234", "phone": "13700137000", "address": "Haidian"});
    let (status, provider) = send(&app, "POST", "/services/providers/register", Some(&provider_token), Some(provider_body.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(provider["status"], "pending");
    let (status, body) = send(&app, "POST", "/services/providers/register", Some(&provider_token), Some(provider_body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already registered as a service provider");

    let no_unit = json!({"category_id": category.id, "title": "Deep clean", "price_cents": 10_000});
    let (status, body) = send(&app, "POST", "/services/items", Some(&provider_token), Some(no_unit)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required field: unit");

    let (status, item) = send(&app, "POST", "/services/items", Some(&provider_token), Some(item_body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_i64().unwrap_or_default();

    let (status, page) = send(&app, "GET", &format!("/services/items?category_id={}&page=1&per_page=5", category.id), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["category"]["name"], "Cleaning");
    let (status, _) = send(&app, "GET", "/services/items/9999", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, tree) = send(&app, "GET", "/services/categories", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree[0]["name"], "Cleaning");

    let coupon = json!({
        "code": "SAVE5",
        "discount_type": "fixed",
        "discount_value": 500,
        "start_date": "2020-01-01T00:00:00Z",
        "end_date": "2099-01-01T00:00:00Z"
    });
    let (status, body) = send(&app, "POST", "/marketing/coupons", Some(&customer_token), Some(coupon.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized");
    let (status, _) = send(&app, "POST", "/marketing/coupons", Some(&admin_token), Some(coupon.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/marketing/coupons", Some(&admin_token), Some(coupon)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Coupon code already exists");

    let (_, available) = send(&app, "GET", "/marketing/coupons", None, None).await?;
    assert_eq!(available.as_array().map(Vec::len), Some(1));
    let (status, claimed) = send(&app, "POST", "/marketing/coupons/claim", Some(&customer_token), Some(json!({"code": "SAVE5"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(claimed["coupon"]["code"], "SAVE5");
    let (status, body) = send(&app, "POST", "/marketing/coupons/claim", Some(&customer_token), Some(json!({"code": "SAVE5"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User has already claimed this coupon");
    let (status, _) = send(&app, "POST", "/marketing/coupons/claim", Some(&customer_token), Some(json!({"code": "NOPE"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let order_body = json!({
        "service_item_id": item_id,
        "appointment_time": "2030-01-01T10:00:00Z",
        "address": "1 Main St",
        "coupon_code": "SAVE5"
    });
    let (status, order) = send(&app, "POST", "/orders", Some(&customer_token), Some(order_body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount_cents"], 9_500);
    assert_eq!(order["service_provider_id"], provider["id"]);
    let order_id = order["id"].as_i64().unwrap_or_default();
    let order_no = order["order_no"].as_str().unwrap_or_default().to_string();

    let (status, _) = send(&app, "GET", &format!("/orders/{order_id}"), Some(&provider_token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, listed) = send(&app, "GET", "/orders?status=pending", Some(&customer_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
    let (status, _) = send(&app, "GET", "/orders?status=bogus", Some(&customer_token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let review = json!({"rating": 5, "comment": "great"});
    let (status, body) = send(&app, "POST", &format!("/orders/{order_id}/review"), Some(&customer_token), Some(review.clone())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order is not completed");

    let (status, link) = send(&app, "POST", "/payments/create", Some(&customer_token), Some(json!({"order_id": order_id}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(link["pay_url"].as_str().unwrap_or_default().contains(&order_no));

    let (status, body) = send(&app, "POST", "/payments/callback", None, Some(json!({"order_no": order_no, "status": "success", "pay_method": "wechat"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Callback received");
    let (_, paid) = send(&app, "GET", &format!("/orders/{order_id}"), Some(&customer_token), None).await?;
    assert_eq!(paid["status"], "paid");
    assert_eq!(paid["paid_amount_cents"], 9_500);
    assert_eq!(paid["pay_method"], "wechat");
    assert!(paid["paid_at"].is_string());

    let (status, body) = send(&app, "POST", &format!("/orders/{order_id}/cancel"), Some(&customer_token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only pending orders can be cancelled");

    let (status, received) = send(&app, "GET", "/orders/received", Some(&provider_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(received["total"], 1);
    let (status, done) = send(&app, "POST", &format!("/orders/{order_id}/complete"), Some(&provider_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");

    let (status, _) = send(&app, "POST", &format!("/orders/{order_id}/review"), Some(&customer_token), Some(json!({"rating": 9, "comment": "x"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "POST", &format!("/orders/{order_id}/review"), Some(&customer_token), Some(review.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", &format!("/orders/{order_id}/review"), Some(&customer_token), Some(review)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order already reviewed");

    let provider_id = provider["id"].as_i64().unwrap_or_default();
    let (status, reviews) = send(&app, "GET", &format!("/services/providers/{provider_id}/reviews"), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews[0]["rating"], 5);

    let (_, mine) = send(&app, "GET", "/marketing/my-coupons", Some(&customer_token), None).await?;
    assert!(mine[0]["used_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn pending_order_cancel_releases_coupon() -> anyhow::Result<()> {
    let (app, db) = build_app().await?;
    let category = models::service_category::create(&db, "Repairs", None, None).await?;
    let item = models::service_item::create(
        &db,
        models::service_item::NewServiceItem {
            category_id: category.id,
            title: "Fix tap".into(),
            price_cents: 3_000,
            unit: Some("visit".into()),
            ..Default::default()
        },
    )
    .await?;
    let token = signup(&app, "dina", "dina@example.com", None).await?;
    let admin = signup(&app, "root", ADMIN_EMAIL, None).await?;
    let coupon = json!({
        "code": "TENOFF",
        "discount_type": "percentage",
        "discount_value": 10,
        "start_date": "2020-01-01T00:00:00Z",
        "end_date": "2099-01-01T00:00:00Z"
    });
    send(&app, "POST", "/marketing/coupons", Some(&admin), Some(coupon)).await?;
    send(&app, "POST", "/marketing/coupons/claim", Some(&token), Some(json!({"code": "TENOFF"}))).await?;

    let body = json!({"service_item_id": item.id, "appointment_time": "2030-05-01T09:00:00+08:00", "address": "2 Side St", "coupon_code": "TENOFF"});
    let (status, order) = send(&app, "POST", "/orders", Some(&token), Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_amount_cents"], 2_700);
    let order_id = order["id"].as_i64().unwrap_or_default();

    let (status, body) = send(&app, "POST", &format!("/orders/{order_id}/cancel"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order cancelled successfully");
    let (_, mine) = send(&app, "GET", "/marketing/my-coupons", Some(&token), None).await?;
    assert!(mine[0]["used_at"].is_null());

    let (status, _) = send(&app, "POST", "/orders", Some(&token), Some(json!({"service_item_id": 4242, "appointment_time": "2030-05-01T09:00:00Z", "address": "x"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_console_requires_admin() -> anyhow::Result<()> {
    let (app, _db) = build_app().await?;
    let user = signup(&app, "eve", "eve@example.com", None).await?;
    let admin = signup(&app, "root", ADMIN_EMAIL, None).await?;

    let (status, _) = send(&app, "GET", "/admin/dashboard", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, "GET", "/admin/dashboard", Some(&user), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");

    let (status, dash) = send(&app, "GET", "/admin/dashboard", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["users"], 2);

    let (status, _) = send(&app, "GET", "/admin/widgets", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, faq) = send(&app, "POST", "/admin/faqs", Some(&admin), Some(json!({"question": "How do I pay?", "answer": "Online."}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let faq_id = faq["id"].as_i64().unwrap_or_default();
    let (_, listed) = send(&app, "GET", "/support/faq", None, None).await?;
    assert_eq!(listed[0]["question"], "How do I pay?");

    let (status, users) = send(&app, "GET", "/admin/users?per_page=1", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users["total"], 2);
    assert_eq!(users["items"].as_array().map(Vec::len), Some(1));

    let eve_id = users["items"][0]["id"].as_i64().unwrap_or_default();
    let (status, updated) = send(&app, "PUT", &format!("/admin/users/{eve_id}"), Some(&admin), Some(json!({"is_active": false}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_active"], false);
    let (status, _) = send(&app, "GET", "/users/profile", Some(&user), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", &format!("/admin/faqs/{faq_id}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/admin/faqs/{faq_id}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "POST", "/admin/faqs/1/explode", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn sms_and_unknown_callbacks() -> anyhow::Result<()> {
    let (app, _db) = build_app().await?;
    let (status, body) = send(&app, "POST", "/notifications/send_sms", None, Some(json!({"phone": "13800138000"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "SMS sent successfully");
    let (status, _) = send(&app, "POST", "/notifications/send_sms", None, Some(json!({"phone": "555"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/payments/callback", None, Some(json!({"order_no": "missing", "status": "success"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Callback received");
    Ok(())
}
