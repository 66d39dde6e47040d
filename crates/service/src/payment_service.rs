//! Payment link creation and the gateway callback.
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::integrations::PaymentGateway;
use crate::order_service;
use models::order::{self, OrderStatus};

pub const DEFAULT_PAY_METHOD: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentLink {
    pub pay_url: String,
}

/// Gateway notification about an order's payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub order_no: String,
    pub status: String,
    pub pay_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Paid { order_id: i32 },
    Ignored(&'static str),
}

#[instrument(skip(db, gateway))]
pub async fn create_payment(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    user_id: i32,
    order_id: i32,
) -> Result<PaymentLink, ServiceError> {
    let found = order_service::get_order(db, user_id, order_id).await?;
    if found.status != OrderStatus::Pending {
        return Err(ServiceError::Validation("Order is not in pending state".into()));
    }
    let pay_url = gateway
        .create_payment_url(&found.order_no, found.total_amount_cents)
        .await
        .map_err(|e| ServiceError::External(e.to_string()))?;
    info!(order_id, order_no = %found.order_no, "payment_link_created");
    Ok(PaymentLink { pay_url })
}

/// Apply a gateway callback. Only `success` for a pending order changes state;
/// everything else is logged and ignored.
#[instrument(skip(db, cb), fields(order_no = %cb.order_no, status = %cb.status))]
pub async fn handle_callback(db: &DatabaseConnection, cb: PaymentCallback) -> Result<CallbackOutcome, ServiceError> {
    if cb.status != "success" {
        warn!(event = "payment_callback_ignored", reason = "non_success_status", "payment not successful");
        return Ok(CallbackOutcome::Ignored("status is not success"));
    }
    let found = order::Entity::find()
        .filter(order::Column::OrderNo.eq(cb.order_no.clone()))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(found) = found else {
        warn!(event = "payment_callback_ignored", reason = "unknown_order", "order not found");
        return Ok(CallbackOutcome::Ignored("order not found"));
    };
    if found.status != OrderStatus::Pending {
        warn!(event = "payment_callback_ignored", reason = "not_pending", order_id = found.id, "order not pending");
        return Ok(CallbackOutcome::Ignored("order is not pending"));
    }
    let method = cb
        .pay_method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_PAY_METHOD);
    let paid = order::mark_paid(db, found, method).await?;
    info!(event = "order_paid", order_id = paid.id, pay_method = method, "payment applied");
    Ok(CallbackOutcome::Paid { order_id: paid.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::MockPaymentGateway;
    use crate::order_service::{create_order, CreateOrderInput};
    use crate::test_support::{get_db, item, user};
    use chrono::{Duration, Utc};

    async fn pending_order(db: &DatabaseConnection, name: &str) -> Result<(i32, order::Model), anyhow::Error> {
        let u = user(db, name).await?;
        let it = item(db, 15_050, None).await?;
        let o = create_order(
            db,
            u.id,
            CreateOrderInput {
                service_item_id: it.id,
                appointment_time: (Utc::now() + Duration::hours(5)).into(),
                address: "3 Hill Ave".into(),
                remark: None,
                coupon_code: None,
            },
        )
        .await?;
        Ok((u.id, o))
    }

    #[tokio::test]
    async fn payment_link_for_pending_orders_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let gw = MockPaymentGateway::new("https://pay.example.com");
        let (uid, o) = pending_order(&db, "wendy").await?;

        let link = create_payment(&db, &gw, uid, o.id).await?;
        assert_eq!(link.pay_url, format!("https://pay.example.com?order_no={}&amount=150.50", o.order_no));

        assert!(matches!(create_payment(&db, &gw, uid + 100, o.id).await, Err(ServiceError::NotFound(_))));

        order::mark_paid(&db, o.clone(), "card").await?;
        let err = create_payment(&db, &gw, uid, o.id).await.unwrap_err();
        assert_eq!(err.message(), "Order is not in pending state");
        Ok(())
    }

    #[tokio::test]
    async fn success_callback_marks_paid_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (_, o) = pending_order(&db, "xena").await?;
        let cb = |status: &str, method: Option<&str>| PaymentCallback {
            order_no: o.order_no.clone(),
            status: status.into(),
            pay_method: method.map(str::to_string),
        };

        assert_eq!(handle_callback(&db, cb("failed", None)).await?, CallbackOutcome::Ignored("status is not success"));
        assert_eq!(handle_callback(&db, cb("success", None)).await?, CallbackOutcome::Paid { order_id: o.id });

        let paid = order::Entity::find_by_id(o.id).one(&db).await?.ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.paid_amount_cents, Some(15_050));
        assert_eq!(paid.pay_method.as_deref(), Some(DEFAULT_PAY_METHOD));
        assert!(paid.paid_at.is_some());

        // replayed callbacks do not touch a paid order
        assert_eq!(
            handle_callback(&db, cb("success", Some("alipay"))).await?,
            CallbackOutcome::Ignored("order is not pending")
        );
        let unknown = PaymentCallback { order_no: "nope".into(), status: "success".into(), pay_method: None };
        assert_eq!(handle_callback(&db, unknown).await?, CallbackOutcome::Ignored("order not found"));
        Ok(())
    }
}
