//! Request id allocation.

use crate::message::RequestId;

/// Hands out request ids counting down from a starting value.
///
/// The real backend issues small ascending ids, so counting down from `u64::MAX`
/// keeps fabricated ids in a separate range. Each allocator owns its counter;
/// ids are unique for the lifetime of the allocator. Exhausting the range is not
/// handled.
///
/// # Examples
///
/// ```
/// use platform_shim_core::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// assert_eq!(ids.next_id().value(), u64::MAX);
/// assert_eq!(ids.next_id().value(), u64::MAX - 1);
/// ```
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is `u64::MAX`.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(u64::MAX)
    }

    /// Create an allocator whose first id is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Allocate the next id.
    pub const fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next);
        self.next = self.next.wrapping_sub(1);
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub const fn peek(&self) -> RequestId {
        RequestId::new(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
