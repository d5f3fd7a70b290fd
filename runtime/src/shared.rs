//! Lock wrapper for hosts that call the platform from several threads.
//!
//! The registry and allocators are plain single-threaded state. `SharedPlatform`
//! serialises every entry point through one mutex around the whole table, so
//! each call sees and leaves the registry consistent.

use parking_lot::Mutex;
use platform_shim_core::{AccountAgeCategory, MessageHandle, MessageType, PlatformApi, RequestId};
use std::sync::Arc;

/// Cloneable handle to a dispatch table guarded by a mutex.
///
/// Every clone drives the same underlying table.
///
/// # Example
///
/// ```ignore
/// let shared = SharedPlatform::new(SyntheticPlatform::new(real, ShimConfig::default()));
///
/// let mut worker = shared.clone();
/// std::thread::spawn(move || worker.request_age_category());
/// ```
#[derive(Debug)]
pub struct SharedPlatform<P> {
    inner: Arc<Mutex<P>>,
}

impl<P> SharedPlatform<P> {
    /// Wrap `platform` in a lock.
    #[must_use]
    pub fn new(platform: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(platform)),
        }
    }

    /// Run `f` with exclusive access to the wrapped table.
    pub fn with<T>(&self, f: impl FnOnce(&mut P) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Recover the wrapped table if this is the last handle to it.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other clones are alive.
    pub fn try_into_inner(self) -> Result<P, Self> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner())
            .map_err(|inner| Self { inner })
    }
}

impl<P> Clone for SharedPlatform<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: PlatformApi> PlatformApi for SharedPlatform<P> {
    fn request_age_category(&mut self) -> RequestId {
        self.inner.lock().request_age_category()
    }

    fn pop_message(&mut self) -> MessageHandle {
        self.inner.lock().pop_message()
    }

    fn message_type(&mut self, message: MessageHandle) -> MessageType {
        self.inner.lock().message_type(message)
    }

    fn native_message(&mut self, message: MessageHandle) -> MessageHandle {
        self.inner.lock().native_message(message)
    }

    fn age_category_result(&mut self, message: MessageHandle) -> MessageHandle {
        self.inner.lock().age_category_result(message)
    }

    fn age_category(&mut self, result: MessageHandle) -> AccountAgeCategory {
        self.inner.lock().age_category(result)
    }

    fn is_error(&mut self, message: MessageHandle) -> bool {
        self.inner.lock().is_error(message)
    }

    fn request_id(&mut self, message: MessageHandle) -> RequestId {
        self.inner.lock().request_id(message)
    }

    fn free_message(&mut self, message: MessageHandle) {
        self.inner.lock().free_message(message);
    }
}
