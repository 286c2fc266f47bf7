//! Outbound reminder delivery for the fee tracker.
//!
//! This crate provides:
//! - `SmsGateway` trait for pluggable SMS providers
//! - HTTP provider implementation speaking the submit/status JSON contract
//! - Phone number normalization to international form
//! - Minijinja-rendered reminder message composition

pub mod composer;
pub mod phone;
pub mod sms;
pub mod traits;

pub use composer::compose;
pub use phone::normalize_phone;
pub use sms::HttpSmsGateway;
pub use traits::{DeliveryReceipt, SmsError, SmsGateway};
