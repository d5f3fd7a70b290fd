//! Platform message identification types.
//!
//! This module defines strong types for the values that cross the platform API
//! boundary: request ids (`RequestId`), opaque message handles (`MessageHandle`),
//! message kind tags (`MessageType`) and the age category result (`AccountAgeCategory`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the platform returns when a request is started.
///
/// Genuine backend ids are small and ascending. Fabricated ids are counted down
/// from `u64::MAX` (see [`IdAllocator`](crate::IdAllocator)), so the two ranges
/// only meet after ~2^63 requests on each side.
///
/// # Examples
///
/// ```
/// use platform_shim_core::RequestId;
///
/// let id = RequestId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(format!("{id}"), "42");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// The id the backend reports when no request could be started.
    pub const INVALID: Self = Self(0);

    /// Create a new `RequestId` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RequestId> for u64 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Opaque identity token for a message object.
///
/// On the real platform this is the address of a native message. The shim never
/// dereferences or interprets it: handles are only compared for equality.
///
/// The null handle is the backend's "no message" answer to a poll.
///
/// # Examples
///
/// ```
/// use platform_shim_core::MessageHandle;
///
/// assert!(MessageHandle::NULL.is_null());
/// assert!(!MessageHandle::new(0x1000).is_null());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageHandle(u64);

impl MessageHandle {
    /// The "no message" handle.
    pub const NULL: Self = Self(0);

    /// Wrap a raw handle value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is the null ("no message") handle.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Tag identifying the logical kind of a platform message.
///
/// The platform uses 32-bit hashes as message type tags. Only the tags the shim
/// cares about are named; any other value is carried through untouched.
///
/// # Examples
///
/// ```
/// use platform_shim_core::MessageType;
///
/// let tag = MessageType::USER_AGE_CATEGORY_GET;
/// assert_eq!(tag, MessageType::new(0x21CB_E0C0));
/// assert_eq!(format!("{tag}"), "0x21cbe0c0");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageType(u32);

impl MessageType {
    /// Tag the backend reports for a handle it does not recognise.
    pub const UNKNOWN: Self = Self(0);

    /// Response to a "get user age category" request.
    pub const USER_AGE_CATEGORY_GET: Self = Self(0x21CB_E0C0);

    /// Response to a "report user age category" request.
    pub const USER_AGE_CATEGORY_REPORT: Self = Self(0x2E4D_D8D6);

    /// Create a message type from its raw tag.
    #[must_use]
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    /// Get the raw tag.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Age category attached to a user account.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAgeCategory {
    /// The platform could not determine the category.
    #[default]
    Unknown,
    /// Child account.
    Child,
    /// Teen account.
    Teen,
    /// Adult account.
    Adult,
}

impl fmt::Display for AccountAgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Adult => "adult",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_conversions() {
        let id = RequestId::from(7_u64);
        assert_eq!(id.value(), 7);

        let raw: u64 = id.into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn request_id_ordering() {
        assert!(RequestId::new(u64::MAX) > RequestId::new(u64::MAX - 1));
    }

    #[test]
    fn null_handle() {
        assert_eq!(MessageHandle::NULL, MessageHandle::new(0));
        assert!(MessageHandle::NULL.is_null());
    }

    #[test]
    fn handle_display_is_hex() {
        assert_eq!(format!("{}", MessageHandle::new(0x10)), "0x0000000000000010");
    }

    #[test]
    fn message_type_display() {
        assert_eq!(format!("{}", MessageType::new(0xAB)), "0x000000ab");
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Panics: Test will fail if serde fails
    fn age_category_serde_names() {
        let json = serde_json::to_string(&AccountAgeCategory::Adult).unwrap();
        assert_eq!(json, "\"adult\"");

        let parsed: AccountAgeCategory = serde_json::from_str("\"teen\"").unwrap();
        assert_eq!(parsed, AccountAgeCategory::Teen);
    }

    #[test]
    fn age_category_defaults_to_unknown() {
        assert_eq!(AccountAgeCategory::default(), AccountAgeCategory::Unknown);
    }
}
