//! Provider Config SDK
//!
//! Models for external provider configuration (payment gateways, KYC vendors,
//! ...). A parameter value is a [`ConfigValue`]: either a [`VaultRef`] to a
//! secret or a plaintext string. The stored two-field shape is
//! [`RawConfigValue`]; converting it rejects the both-set and neither-set
//! states.

#![forbid(unsafe_code)]

pub mod error;
pub mod models;

pub use error::ConfigValueError;
pub use models::{ConfigValue, ProviderConfig, RawConfigValue, VaultRef, merged_parameters};
