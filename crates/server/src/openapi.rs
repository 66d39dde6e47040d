//! OpenAPI document. The request schemas below exist for documentation only;
//! handlers deserialize into the service and model types.
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub email: String, pub phone: Option<String>, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponse { pub access_token: String, pub token_type: String, pub expires_in: i64 }

#[derive(ToSchema)]
pub struct UpdateProfileRequest { pub username: Option<String>, pub avatar: Option<String>, pub phone: Option<String> }

#[derive(ToSchema)]
pub struct ChangePasswordRequest { pub old_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct AddressRequest {
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    pub phone: String,
    pub name: Option<String>,
}

#[derive(ToSchema)]
pub struct ServiceItemRequest {
    pub category_id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Price in cents.
    pub price_cents: i64,
    pub unit: String,
    /// Comma separated image URLs.
    pub images: Option<String>,
    pub is_on_sale: Option<bool>,
}

#[derive(ToSchema)]
pub struct ProviderRequest {
    pub real_name: String,
    pub id_card: String,
    pub phone: String,
    pub address: String,
    pub experience: Option<String>,
    pub certificates: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateOrderRequestDoc {
    pub service_item_id: i32,
    /// RFC 3339 timestamp.
    pub appointment_time: String,
    pub address: String,
    pub remark: Option<String>,
    pub coupon_code: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewRequestDoc { pub rating: i32, pub comment: String, pub images: Option<String> }

#[derive(ToSchema)]
pub struct CreatePaymentRequestDoc { pub order_id: i32 }

#[derive(ToSchema)]
pub struct PaymentLinkDoc { pub pay_url: String }

#[derive(ToSchema)]
pub struct PaymentCallbackDoc {
    pub order_no: String,
    /// `success` marks the order paid; anything else is ignored.
    pub status: String,
    pub pay_method: Option<String>,
}

#[derive(ToSchema)]
pub struct CouponRequest {
    pub code: String,
    /// `percentage` or `fixed`
    pub discount_type: String,
    /// Percent (1..=100) or cents.
    pub discount_value: i64,
    pub start_date: String,
    pub end_date: String,
    pub is_active: Option<bool>,
    pub min_spend_cents: Option<i64>,
    pub max_discount_cents: Option<i64>,
    pub usage_limit: Option<i32>,
}

#[derive(ToSchema)]
pub struct ClaimRequestDoc { pub code: String }

#[derive(ToSchema)]
pub struct SendSmsRequestDoc { pub phone: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::profile,
        crate::routes::users::update_profile,
        crate::routes::users::change_password,
        crate::routes::users::add_address,
        crate::routes::users::list_addresses,
        crate::routes::services::list_categories,
        crate::routes::services::list_items,
        crate::routes::services::get_item,
        crate::routes::services::add_item,
        crate::routes::services::register_provider,
        crate::routes::services::provider_reviews,
        crate::routes::orders::create_order,
        crate::routes::orders::list_orders,
        crate::routes::orders::list_received,
        crate::routes::orders::get_order,
        crate::routes::orders::cancel_order,
        crate::routes::orders::complete_order,
        crate::routes::orders::create_review,
        crate::routes::payments::create_payment,
        crate::routes::payments::payment_callback,
        crate::routes::marketing::create_coupon,
        crate::routes::marketing::list_available,
        crate::routes::marketing::claim_coupon,
        crate::routes::marketing::my_coupons,
        crate::routes::notifications::send_sms,
        crate::routes::support::list_faq,
        crate::routes::admin::dashboard,
        crate::routes::admin::list,
        crate::routes::admin::create,
        crate::routes::admin::fetch,
        crate::routes::admin::update,
        crate::routes::admin::remove,
        crate::routes::admin::perform,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            ChangePasswordRequest,
            AddressRequest,
            ServiceItemRequest,
            ProviderRequest,
            CreateOrderRequestDoc,
            ReviewRequestDoc,
            CreatePaymentRequestDoc,
            PaymentLinkDoc,
            PaymentCallbackDoc,
            CouponRequest,
            ClaimRequestDoc,
            SendSmsRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "services"),
        (name = "orders"),
        (name = "payments"),
        (name = "marketing"),
        (name = "notifications"),
        (name = "support"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
