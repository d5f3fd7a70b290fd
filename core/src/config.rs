//! Shim configuration.
//!
//! Controls which message kind is fabricated, what the fabricated age category
//! resolves to, and where the fabricated id range starts. The defaults reproduce
//! the platform's "get user age category" request answered with an adult account.

use crate::error::Result;
use crate::message::{AccountAgeCategory, MessageType};
use serde::Deserialize;

/// Configuration for the synthetic request decorator.
///
/// # Examples
///
/// ```
/// use platform_shim_core::{AccountAgeCategory, ShimConfig};
///
/// let config = ShimConfig::default().with_age_category(AccountAgeCategory::Teen);
/// assert_eq!(config.age_category, AccountAgeCategory::Teen);
/// assert_eq!(config.first_request_id, u64::MAX);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Tag stored on every fabricated request.
    ///
    /// Default: `MessageType::USER_AGE_CATEGORY_GET`
    pub message_type: MessageType,

    /// Value the fabricated result resolves to.
    ///
    /// Default: `AccountAgeCategory::Adult`
    pub age_category: AccountAgeCategory,

    /// First fabricated request id; later ids count down from here.
    ///
    /// Default: `u64::MAX`
    pub first_request_id: u64,
}

impl ShimConfig {
    /// Create a configuration with the default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message_type: MessageType::USER_AGE_CATEGORY_GET,
            age_category: AccountAgeCategory::Adult,
            first_request_id: u64::MAX,
        }
    }

    /// Set the fabricated message kind.
    #[must_use]
    pub const fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    /// Set the fabricated age category.
    #[must_use]
    pub const fn with_age_category(mut self, age_category: AccountAgeCategory) -> Self {
        self.age_category = age_category;
        self
    }

    /// Set the first fabricated request id.
    #[must_use]
    pub const fn with_first_request_id(mut self, first_request_id: u64) -> Self {
        self.first_request_id = first_request_id;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ShimError::Config` if the input is not valid JSON for this type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self::new()
    }
}
