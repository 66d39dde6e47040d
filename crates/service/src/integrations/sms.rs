use async_trait::async_trait;
use tracing::{info, instrument};

use super::IntegrationError;

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), IntegrationError>;
}

/// Writes outgoing messages to the log instead of a carrier.
#[derive(Debug, Default, Clone)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    #[instrument(skip(self, message))]
    async fn send(&self, phone: &str, message: &str) -> Result<(), IntegrationError> {
        info!(event = "sms_sent", phone, message, "simulated sms delivery");
        Ok(())
    }
}
