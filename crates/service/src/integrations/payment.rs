use async_trait::async_trait;
use tracing::{info, instrument};

use super::IntegrationError;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// URL the customer follows to pay `amount_cents` for `order_no`.
    async fn create_payment_url(&self, order_no: &str, amount_cents: i64) -> Result<String, IntegrationError>;
}

/// Builds a checkout link on a fixed base URL without calling out.
#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
    pub base_url: String,
}

impl MockPaymentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

/// Cents rendered as a decimal amount, e.g. `12345` -> `123.45`.
pub fn format_amount(amount_cents: i64) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    #[instrument(skip(self))]
    async fn create_payment_url(&self, order_no: &str, amount_cents: i64) -> Result<String, IntegrationError> {
        if order_no.is_empty() {
            return Err(IntegrationError::Payment("order number required".into()));
        }
        let url = format!(
            "{}?order_no={}&amount={}",
            self.base_url.trim_end_matches('?'),
            order_no,
            format_amount(amount_cents)
        );
        info!(event = "payment_url_created", order_no, "simulated payment gateway");
        Ok(url)
    }
}
