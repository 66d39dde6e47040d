pub mod errors;
pub mod db;
pub mod validation;
pub mod user;
pub mod address;
pub mod service_category;
pub mod service_item;
pub mod service_provider;
pub mod order;
pub mod order_review;
pub mod coupon;
pub mod user_coupon;
pub mod faq;

#[cfg(test)]
mod tests;
