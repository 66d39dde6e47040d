//! Service layer providing the marketplace's business operations on top of `models`.
//! - Handlers call these functions; they never touch entities directly.
//! - Reuses validation and entity definitions from the `models` crate.
//! - Every operation reports failures as [`errors::ServiceError`].

pub mod errors;
pub mod auth;
pub mod integrations;
pub mod paging;
pub mod user_service;
pub mod catalog_service;
pub mod coupon_service;
pub mod order_service;
pub mod payment_service;
pub mod notification_service;
pub mod support_service;
pub mod admin_service;
#[cfg(test)]
pub mod test_support;
