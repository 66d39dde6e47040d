//! Outbound integrations. Only logging and mock implementations ship here;
//! real providers plug in behind the same traits.

pub mod payment;
pub mod sms;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("sms delivery failed: {0}")]
    Sms(String),
    #[error("payment gateway error: {0}")]
    Payment(String),
}

pub use payment::{MockPaymentGateway, PaymentGateway};
pub use sms::{LogSmsSender, SmsSender};
