//! Synthetic message handle allocation.
//!
//! Fabricated messages need a handle the client can pass back to the platform API.
//! Instead of allocating real memory, handles are slot indices tagged with the top
//! bit of the 64-bit value, a range genuine native handles never occupy.

use crate::error::{Result, ShimError};
use crate::message::MessageHandle;

/// Top bit set on every synthetic handle.
pub const SYNTHETIC_HANDLE_TAG: u64 = 1 << 63;

/// Slot allocator for synthetic message handles.
///
/// Every live handle is distinct. Released slots are reused, most recently
/// released first, so a freed handle's value may come back for a later request.
///
/// # Examples
///
/// ```
/// use platform_shim_core::HandleAllocator;
///
/// let mut handles = HandleAllocator::new();
/// let a = handles.new_handle();
/// let b = handles.new_handle();
/// assert_ne!(a, b);
///
/// handles.release(a).unwrap();
/// assert!(handles.release(a).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HandleAllocator {
    live: Vec<bool>,
    free: Vec<usize>,
}

impl HandleAllocator {
    /// Create an allocator with no live handles.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            live: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Allocate a handle distinct from every other live handle.
    pub fn new_handle(&mut self) -> MessageHandle {
        let slot = self.free.pop().unwrap_or(self.live.len());
        if slot == self.live.len() {
            self.live.push(true);
        } else {
            self.live[slot] = true;
        }
        MessageHandle::new(SYNTHETIC_HANDLE_TAG | slot as u64)
    }

    /// Release a handle so its slot can be reused.
    ///
    /// # Errors
    ///
    /// - `UnknownHandle`: the handle was never issued by this allocator
    /// - `DoubleRelease`: the handle was already released
    pub fn release(&mut self, handle: MessageHandle) -> Result<()> {
        let slot = Self::slot_of(handle).ok_or(ShimError::UnknownHandle(handle))?;
        match self.live.get_mut(slot) {
            Some(live) if *live => {
                *live = false;
                self.free.push(slot);
                Ok(())
            }
            Some(_) => Err(ShimError::DoubleRelease(handle)),
            None => Err(ShimError::UnknownHandle(handle)),
        }
    }

    /// Whether `handle` is currently live in this allocator.
    #[must_use]
    pub fn is_live(&self, handle: MessageHandle) -> bool {
        Self::slot_of(handle)
            .and_then(|slot| self.live.get(slot))
            .copied()
            .unwrap_or(false)
    }

    /// Number of live handles.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len() - self.free.len()
    }

    /// Whether `handle` lies in the synthetic namespace.
    #[must_use]
    pub const fn is_synthetic(handle: MessageHandle) -> bool {
        handle.raw() & SYNTHETIC_HANDLE_TAG != 0
    }

    /// Slot index of a synthetic handle. `None` for genuine handles and for
    /// slots that do not fit the platform's address width.
    fn slot_of(handle: MessageHandle) -> Option<usize> {
        if Self::is_synthetic(handle) {
            usize::try_from(handle.raw() & !SYNTHETIC_HANDLE_TAG).ok()
        } else {
            None
        }
    }
}
