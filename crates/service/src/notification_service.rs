//! Verification code delivery over SMS.
use rand::Rng;
use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::integrations::SmsSender;
use models::validation;

pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Random numeric code of `len` digits.
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}

/// Send a fresh verification code to `phone`.
#[instrument(skip(sender))]
pub async fn send_sms(sender: &dyn SmsSender, phone: &str, code_length: usize) -> Result<(), ServiceError> {
    if phone.trim().is_empty() {
        return Err(ServiceError::Validation("Missing required field: phone".into()));
    }
    if !validation::is_valid_phone(phone) {
        return Err(ServiceError::Validation("Invalid phone number format".into()));
    }
    let code = generate_code(code_length);
    let message = format!("Your verification code is {code}");
    sender.send(phone, &message).await.map_err(|e| {
        error!(event = "sms_failed", error = %e, "sms delivery failed");
        ServiceError::External("Failed to send SMS".into())
    })?;
    info!(event = "verification_code_sent", "verification code sent");
    Ok(())
}
