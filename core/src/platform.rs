//! The platform dispatch table.
//!
//! `PlatformApi` has one method per intercepted entry point. The bootstrap layer
//! installs one implementation as the active table: either the real backend, or
//! the synthetic-aware decorator from `platform-shim-runtime` wrapping it.

use crate::message::{AccountAgeCategory, MessageHandle, MessageType, RequestId};

/// Entry points of the platform's request/response API.
///
/// Methods take `&mut self`: the table is driven from one thread at a time.
/// Hosts that call in from several threads wrap the whole table in a lock
/// (see `SharedPlatform` in `platform-shim-runtime`).
///
/// # Examples
///
/// ```
/// use platform_shim_core::{
///     AccountAgeCategory, MessageHandle, MessageType, PlatformApi, RequestId,
/// };
///
/// // A backend with nothing queued that rejects every handle
/// struct Offline;
///
/// impl PlatformApi for Offline {
///     fn request_age_category(&mut self) -> RequestId { RequestId::INVALID }
///     fn pop_message(&mut self) -> MessageHandle { MessageHandle::NULL }
///     fn message_type(&mut self, _: MessageHandle) -> MessageType { MessageType::UNKNOWN }
///     fn native_message(&mut self, _: MessageHandle) -> MessageHandle { MessageHandle::NULL }
///     fn age_category_result(&mut self, _: MessageHandle) -> MessageHandle { MessageHandle::NULL }
///     fn age_category(&mut self, _: MessageHandle) -> AccountAgeCategory {
///         AccountAgeCategory::Unknown
///     }
///     fn is_error(&mut self, _: MessageHandle) -> bool { true }
///     fn request_id(&mut self, _: MessageHandle) -> RequestId { RequestId::INVALID }
///     fn free_message(&mut self, _: MessageHandle) {}
/// }
///
/// assert!(Offline.pop_message().is_null());
/// ```
pub trait PlatformApi {
    /// Start a "get user age category" request.
    fn request_age_category(&mut self) -> RequestId;

    /// Take the next completed message off the queue, or `MessageHandle::NULL`.
    fn pop_message(&mut self) -> MessageHandle;

    /// Kind of the message behind `message`.
    fn message_type(&mut self, message: MessageHandle) -> MessageType;

    /// Native message object behind `message`.
    fn native_message(&mut self, message: MessageHandle) -> MessageHandle;

    /// Age category result object carried by `message`.
    fn age_category_result(&mut self, message: MessageHandle) -> MessageHandle;

    /// Resolve an age category result object to its value.
    fn age_category(&mut self, result: MessageHandle) -> AccountAgeCategory;

    /// Whether `message` reports a failed request.
    fn is_error(&mut self, message: MessageHandle) -> bool;

    /// Id of the request `message` answers.
    fn request_id(&mut self, message: MessageHandle) -> RequestId;

    /// Release `message`. Every popped message must be freed exactly once.
    fn free_message(&mut self, message: MessageHandle);
}

impl<P: PlatformApi + ?Sized> PlatformApi for Box<P> {
    fn request_age_category(&mut self) -> RequestId {
        (**self).request_age_category()
    }

    fn pop_message(&mut self) -> MessageHandle {
        (**self).pop_message()
    }

    fn message_type(&mut self, message: MessageHandle) -> MessageType {
        (**self).message_type(message)
    }

    fn native_message(&mut self, message: MessageHandle) -> MessageHandle {
        (**self).native_message(message)
    }

    fn age_category_result(&mut self, message: MessageHandle) -> MessageHandle {
        (**self).age_category_result(message)
    }

    fn age_category(&mut self, result: MessageHandle) -> AccountAgeCategory {
        (**self).age_category(result)
    }

    fn is_error(&mut self, message: MessageHandle) -> bool {
        (**self).is_error(message)
    }

    fn request_id(&mut self, message: MessageHandle) -> RequestId {
        (**self).request_id(message)
    }

    fn free_message(&mut self, message: MessageHandle) {
        (**self).free_message(message);
    }
}
