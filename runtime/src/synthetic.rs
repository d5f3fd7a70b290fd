//! The synthetic-aware platform decorator.
//!
//! [`SyntheticPlatform`] wraps the real backend and answers every age category
//! request itself. Each entry point follows the same decision:
//!
//! - **synthesise**: starting a request always fabricates a new descriptor
//! - **answer from the registry**: a handle owned by a live descriptor is answered
//!   from that descriptor
//! - **forward**: anything else goes to the real backend unchanged, and its result
//!   (including its error behaviour) is returned as-is
//!
//! Fabricated messages take priority on every poll, so a client drains them before
//! it sees any genuine message.

use crate::metrics::{self, EntryPoint};
use platform_shim_core::{
    AccountAgeCategory, Descriptor, MessageHandle, MessageType, PlatformApi, RequestId,
    ShimConfig, SyntheticRegistry,
};

/// Decorator answering fabricated requests and forwarding everything else.
///
/// # Example
///
/// ```ignore
/// let mut platform = SyntheticPlatform::new(real_backend, ShimConfig::default());
///
/// let request_id = platform.request_age_category();
/// let message = platform.pop_message();
/// assert_eq!(platform.request_id(message), request_id);
///
/// let result = platform.age_category_result(message);
/// assert_eq!(platform.age_category(result), AccountAgeCategory::Adult);
/// platform.free_message(message);
/// ```
#[derive(Debug)]
pub struct SyntheticPlatform<P> {
    real: P,
    registry: SyntheticRegistry,
    config: ShimConfig,
}

impl<P: PlatformApi> SyntheticPlatform<P> {
    /// Install the decorator in front of `real`.
    #[must_use]
    pub fn new(real: P, config: ShimConfig) -> Self {
        tracing::info!(
            message_type = %config.message_type,
            age_category = %config.age_category,
            first_request_id = config.first_request_id,
            "Installed synthetic platform decorator"
        );

        Self {
            real,
            registry: SyntheticRegistry::with_first_request_id(config.first_request_id),
            config,
        }
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn real(&self) -> &P {
        &self.real
    }

    /// The wrapped backend, mutably.
    pub const fn real_mut(&mut self) -> &mut P {
        &mut self.real
    }

    /// Live fabricated requests.
    #[must_use]
    pub const fn registry(&self) -> &SyntheticRegistry {
        &self.registry
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ShimConfig {
        &self.config
    }

    /// Drop every fabricated request. Returns how many were dropped.
    pub fn reset(&mut self) -> usize {
        let dropped = self.registry.reset();
        metrics::set_live_requests(0);
        tracing::debug!(dropped, "Reset synthetic registry");
        dropped
    }

    /// Uninstall the decorator and hand back the real backend.
    ///
    /// Fabricated requests that were never freed are dropped.
    pub fn into_inner(mut self) -> P {
        let leaked = self.registry.reset();
        if leaked > 0 {
            tracing::warn!(leaked, "Uninstalled with unfreed synthetic messages");
        }
        metrics::set_live_requests(0);
        tracing::info!("Uninstalled synthetic platform decorator");
        self.real
    }

    fn synthesized(&self, handle: MessageHandle, entry_point: EntryPoint) -> Option<Descriptor> {
        let descriptor = self.registry.find_by_handle(handle).copied();
        if descriptor.is_some() {
            metrics::record_synthesized(entry_point);
        }
        descriptor
    }

    fn forward<T>(&mut self, entry_point: EntryPoint, call: impl FnOnce(&mut P) -> T) -> T {
        tracing::trace!(%entry_point, "Forwarding to real backend");
        metrics::record_forwarded(entry_point);
        call(&mut self.real)
    }
}

impl<P: PlatformApi> PlatformApi for SyntheticPlatform<P> {
    fn request_age_category(&mut self) -> RequestId {
        let (request_id, handle) = self.registry.create(self.config.message_type);
        tracing::debug!(%request_id, %handle, "Returning synthetic request id");

        metrics::record_synthesized(EntryPoint::RequestAgeCategory);
        metrics::set_live_requests(self.registry.len());
        request_id
    }

    fn pop_message(&mut self) -> MessageHandle {
        if let Some(descriptor) = self.registry.first_unpopped().copied() {
            if let Err(error) = self.registry.mark_popped(descriptor.handle()) {
                tracing::error!(%error, %descriptor, "Failed to mark synthetic message popped");
            }
            tracing::debug!(%descriptor, "Popping synthetic message");

            metrics::record_synthesized(EntryPoint::PopMessage);
            return descriptor.handle();
        }

        self.forward(EntryPoint::PopMessage, |real| real.pop_message())
    }

    fn message_type(&mut self, message: MessageHandle) -> MessageType {
        if let Some(descriptor) = self.synthesized(message, EntryPoint::MessageType) {
            tracing::debug!(%descriptor, "Returning synthetic message type");
            return descriptor.message_type();
        }

        self.forward(EntryPoint::MessageType, |real| real.message_type(message))
    }

    fn native_message(&mut self, message: MessageHandle) -> MessageHandle {
        // A fabricated message is its own native object
        if self.synthesized(message, EntryPoint::NativeMessage).is_some() {
            return message;
        }

        self.forward(EntryPoint::NativeMessage, |real| real.native_message(message))
    }

    fn age_category_result(&mut self, message: MessageHandle) -> MessageHandle {
        // The result object of a fabricated message is the message itself
        if let Some(descriptor) = self.synthesized(message, EntryPoint::AgeCategoryResult) {
            return descriptor.handle();
        }

        self.forward(EntryPoint::AgeCategoryResult, |real| {
            real.age_category_result(message)
        })
    }

    fn age_category(&mut self, result: MessageHandle) -> AccountAgeCategory {
        if let Some(descriptor) = self.synthesized(result, EntryPoint::AgeCategory) {
            let age_category = self.config.age_category;
            tracing::debug!(
                request_id = %descriptor.request_id(),
                %age_category,
                "Returning synthetic age category"
            );
            return age_category;
        }

        self.forward(EntryPoint::AgeCategory, |real| real.age_category(result))
    }

    fn is_error(&mut self, message: MessageHandle) -> bool {
        if self.synthesized(message, EntryPoint::IsError).is_some() {
            return false;
        }

        self.forward(EntryPoint::IsError, |real| real.is_error(message))
    }

    fn request_id(&mut self, message: MessageHandle) -> RequestId {
        if let Some(descriptor) = self.synthesized(message, EntryPoint::RequestId) {
            return descriptor.request_id();
        }

        self.forward(EntryPoint::RequestId, |real| real.request_id(message))
    }

    fn free_message(&mut self, message: MessageHandle) {
        if self.synthesized(message, EntryPoint::FreeMessage).is_some() {
            match self.registry.remove_and_release(message) {
                Ok(descriptor) => tracing::debug!(%descriptor, "Freeing synthetic message"),
                Err(error) => {
                    tracing::error!(%error, "Failed to free synthetic message");
                }
            }
            metrics::set_live_requests(self.registry.len());
            return;
        }

        self.forward(EntryPoint::FreeMessage, |real| real.free_message(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that must never be reached.
    struct Unreachable;

    impl PlatformApi for Unreachable {
        fn request_age_category(&mut self) -> RequestId {
            RequestId::INVALID
        }
        fn pop_message(&mut self) -> MessageHandle {
            MessageHandle::NULL
        }
        fn message_type(&mut self, _: MessageHandle) -> MessageType {
            MessageType::UNKNOWN
        }
        fn native_message(&mut self, _: MessageHandle) -> MessageHandle {
            MessageHandle::NULL
        }
        fn age_category_result(&mut self, _: MessageHandle) -> MessageHandle {
            MessageHandle::NULL
        }
        fn age_category(&mut self, _: MessageHandle) -> AccountAgeCategory {
            AccountAgeCategory::Unknown
        }
        fn is_error(&mut self, _: MessageHandle) -> bool {
            true
        }
        fn request_id(&mut self, _: MessageHandle) -> RequestId {
            RequestId::INVALID
        }
        fn free_message(&mut self, _: MessageHandle) {}
    }

    #[test]
    fn request_never_reaches_backend() {
        let mut platform = SyntheticPlatform::new(Unreachable, ShimConfig::default());
        let request_id = platform.request_age_category();

        assert_eq!(request_id, RequestId::new(u64::MAX));
        assert_eq!(platform.registry().len(), 1);
    }

    #[test]
    fn configured_values_are_used() {
        let config = ShimConfig::new()
            .with_message_type(MessageType::USER_AGE_CATEGORY_REPORT)
            .with_age_category(AccountAgeCategory::Teen)
            .with_first_request_id(77);
        let mut platform = SyntheticPlatform::new(Unreachable, config);

        assert_eq!(platform.request_age_category(), RequestId::new(77));
        let message = platform.pop_message();
        assert_eq!(
            platform.message_type(message),
            MessageType::USER_AGE_CATEGORY_REPORT
        );
        let result = platform.age_category_result(message);
        assert_eq!(platform.age_category(result), AccountAgeCategory::Teen);
    }

    #[test]
    fn reset_empties_registry() {
        let mut platform = SyntheticPlatform::new(Unreachable, ShimConfig::default());
        platform.request_age_category();
        platform.request_age_category();

        assert_eq!(platform.reset(), 2);
        assert!(platform.registry().is_empty());
        assert!(platform.pop_message().is_null());
    }

    #[test]
    fn into_inner_returns_backend() {
        let mut platform = SyntheticPlatform::new(Unreachable, ShimConfig::default());
        platform.request_age_category();

        let mut real = platform.into_inner();
        assert!(real.pop_message().is_null());
    }
}
