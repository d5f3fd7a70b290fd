//! Registry of fabricated in-flight requests.
//!
//! A fabricated request goes through three states:
//!
//! 1. **Created**: [`SyntheticRegistry::create`] appends a descriptor
//! 2. **Popped**: [`SyntheticRegistry::mark_popped`] records delivery through the poll
//! 3. **Freed**: [`SyntheticRegistry::remove_and_release`] drops it and releases the handle
//!
//! A descriptor can be queried any number of times while Created or Popped, and
//! never after it is Freed.

use crate::error::{Result, ShimError};
use crate::handle::HandleAllocator;
use crate::id::IdAllocator;
use crate::message::{MessageHandle, MessageType, RequestId};
use indexmap::IndexMap;
use std::fmt;

/// Bookkeeping for one fabricated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    request_id: RequestId,
    message_type: MessageType,
    handle: MessageHandle,
    popped: bool,
}

impl Descriptor {
    /// Id returned to the client when the request was started.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Kind of message this descriptor fabricates.
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Handle standing in for the native message object.
    #[must_use]
    pub const fn handle(&self) -> MessageHandle {
        self.handle
    }

    /// Whether the message was already delivered by a poll.
    #[must_use]
    pub const fn is_popped(&self) -> bool {
        self.popped
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(requestId: {}, messageType: {}, handle: {})",
            self.request_id, self.message_type, self.handle
        )
    }
}

/// Ordered table of live fabricated requests.
///
/// Descriptors are keyed by handle for constant-time lookup and kept in creation
/// order so polls deliver them first-in, first-out.
///
/// # Invariants
///
/// - No two live descriptors share a handle
/// - Request ids strictly decrease in creation order
/// - A descriptor is popped at most once and never un-popped
///
/// # Examples
///
/// ```
/// use platform_shim_core::{MessageType, SyntheticRegistry};
///
/// # fn main() -> platform_shim_core::Result<()> {
/// let mut registry = SyntheticRegistry::new();
/// let (_, handle) = registry.create(MessageType::USER_AGE_CATEGORY_GET);
///
/// assert_eq!(registry.first_unpopped().map(|d| d.handle()), Some(handle));
/// registry.mark_popped(handle)?;
/// assert!(registry.first_unpopped().is_none());
///
/// registry.remove_and_release(handle)?;
/// assert!(registry.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyntheticRegistry {
    entries: IndexMap<MessageHandle, Descriptor>,
    ids: IdAllocator,
    handles: HandleAllocator,
}

impl SyntheticRegistry {
    /// Create an empty registry whose first request id is `u64::MAX`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry whose first request id is `first_request_id`.
    #[must_use]
    pub fn with_first_request_id(first_request_id: u64) -> Self {
        Self {
            entries: IndexMap::new(),
            ids: IdAllocator::starting_at(first_request_id),
            handles: HandleAllocator::new(),
        }
    }

    /// Fabricate a new request of kind `message_type`.
    ///
    /// Allocates an id and a handle and appends a Created descriptor.
    pub fn create(&mut self, message_type: MessageType) -> (RequestId, MessageHandle) {
        let request_id = self.ids.next_id();
        let handle = self.handles.new_handle();
        let descriptor = Descriptor {
            request_id,
            message_type,
            handle,
            popped: false,
        };

        if let Some(stale) = self.entries.insert(handle, descriptor) {
            tracing::error!(
                error = %ShimError::HandleCollision(handle),
                %stale,
                "Replaced a live descriptor"
            );
        }

        (request_id, handle)
    }

    /// Find the live descriptor owning `handle`.
    #[must_use]
    pub fn find_by_handle(&self, handle: MessageHandle) -> Option<&Descriptor> {
        self.entries.get(&handle)
    }

    /// The earliest-created descriptor not yet delivered by a poll.
    #[must_use]
    pub fn first_unpopped(&self) -> Option<&Descriptor> {
        self.entries.values().find(|descriptor| !descriptor.popped)
    }

    /// Record that the descriptor owning `handle` was delivered.
    ///
    /// # Errors
    ///
    /// - `UnknownHandle`: no live descriptor owns `handle`
    /// - `AlreadyPopped`: the descriptor was already delivered
    pub fn mark_popped(&mut self, handle: MessageHandle) -> Result<()> {
        let descriptor = self
            .entries
            .get_mut(&handle)
            .ok_or(ShimError::UnknownHandle(handle))?;

        if descriptor.popped {
            return Err(ShimError::AlreadyPopped(handle));
        }
        descriptor.popped = true;
        Ok(())
    }

    /// Remove the descriptor owning `handle` and release the handle.
    ///
    /// Remaining descriptors keep their creation order.
    ///
    /// # Errors
    ///
    /// - `UnknownHandle`: no live descriptor owns `handle`
    /// - `DoubleRelease`: the handle's slot was already released
    pub fn remove_and_release(&mut self, handle: MessageHandle) -> Result<Descriptor> {
        let descriptor = self
            .entries
            .shift_remove(&handle)
            .ok_or(ShimError::UnknownHandle(handle))?;
        self.handles.release(handle)?;
        Ok(descriptor)
    }

    /// Release every live handle and empty the registry.
    ///
    /// The id counter is not rewound, so ids stay unique across resets.
    /// Returns the number of descriptors dropped.
    pub fn reset(&mut self) -> usize {
        let dropped = self.entries.len();
        for (handle, _) in self.entries.drain(..) {
            if let Err(error) = self.handles.release(handle) {
                tracing::error!(%error, "Failed to release handle during reset");
            }
        }
        dropped
    }

    /// Number of live descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fabricated request is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live descriptors in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.entries.values()
    }

    /// The id the next [`create`](Self::create) will assign.
    #[must_use]
    pub const fn next_request_id(&self) -> RequestId {
        self.ids.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KIND: MessageType = MessageType::USER_AGE_CATEGORY_GET;

    #[test]
    fn create_appends_a_created_descriptor() {
        let mut registry = SyntheticRegistry::new();
        let (request_id, handle) = registry.create(KIND);

        assert_eq!(registry.len(), 1);
        assert_eq!(request_id, RequestId::new(u64::MAX));

        let descriptor = registry.find_by_handle(handle);
        assert!(descriptor.is_some_and(|d| !d.is_popped()));
        assert_eq!(descriptor.map(Descriptor::request_id), Some(request_id));
        assert_eq!(descriptor.map(Descriptor::message_type), Some(KIND));
    }

    #[test]
    fn unknown_handle_is_not_found() {
        let registry = SyntheticRegistry::new();
        assert!(registry.find_by_handle(MessageHandle::new(0x1234)).is_none());
        assert!(registry.first_unpopped().is_none());
    }

    #[test]
    fn first_unpopped_follows_creation_order() {
        let mut registry = SyntheticRegistry::new();
        let (_, first) = registry.create(KIND);
        let (_, second) = registry.create(KIND);

        assert_eq!(registry.first_unpopped().map(Descriptor::handle), Some(first));
        assert_eq!(registry.mark_popped(first), Ok(()));
        assert_eq!(registry.first_unpopped().map(Descriptor::handle), Some(second));
        assert_eq!(registry.mark_popped(second), Ok(()));
        assert!(registry.first_unpopped().is_none());
    }

    #[test]
    fn mark_popped_twice_is_reported() {
        let mut registry = SyntheticRegistry::new();
        let (_, handle) = registry.create(KIND);

        assert_eq!(registry.mark_popped(handle), Ok(()));
        assert_eq!(registry.mark_popped(handle), Err(ShimError::AlreadyPopped(handle)));
        assert!(registry.find_by_handle(handle).is_some_and(Descriptor::is_popped));
    }

    #[test]
    fn remove_keeps_order_of_remaining() {
        let mut registry = SyntheticRegistry::new();
        let (_, a) = registry.create(KIND);
        let (_, b) = registry.create(KIND);
        let (_, c) = registry.create(KIND);

        assert!(registry.remove_and_release(b).is_ok());

        let order: Vec<_> = registry.iter().map(Descriptor::handle).collect();
        assert_eq!(order, vec![a, c]);
        assert!(registry.find_by_handle(b).is_none());
    }

    #[test]
    fn remove_unknown_is_reported() {
        let mut registry = SyntheticRegistry::new();
        let stray = MessageHandle::new(0x4000);
        assert_eq!(
            registry.remove_and_release(stray),
            Err(ShimError::UnknownHandle(stray))
        );
    }

    #[test]
    fn freed_handle_may_be_reused_without_sharing() {
        let mut registry = SyntheticRegistry::new();
        let (first_id, first) = registry.create(KIND);
        assert!(registry.remove_and_release(first).is_ok());

        let (second_id, second) = registry.create(KIND);
        assert_eq!(registry.len(), 1);
        assert!(second_id < first_id);
        assert_eq!(
            registry.find_by_handle(second).map(Descriptor::request_id),
            Some(second_id)
        );
    }

    #[test]
    fn reset_drops_everything_but_keeps_ids_moving() {
        let mut registry = SyntheticRegistry::new();
        registry.create(KIND);
        registry.create(KIND);

        assert_eq!(registry.reset(), 2);
        assert!(registry.is_empty());

        let (request_id, _) = registry.create(KIND);
        assert_eq!(request_id, RequestId::new(u64::MAX - 2));
    }

    #[test]
    fn custom_first_request_id() {
        let mut registry = SyntheticRegistry::with_first_request_id(1_000);
        assert_eq!(registry.next_request_id(), RequestId::new(1_000));
        let (request_id, _) = registry.create(KIND);
        assert_eq!(request_id.value(), 1_000);
    }

    #[test]
    fn descriptor_display() {
        let mut registry = SyntheticRegistry::with_first_request_id(5);
        let (_, handle) = registry.create(MessageType::new(0x10));
        let rendered = registry
            .find_by_handle(handle)
            .map(ToString::to_string)
            .unwrap_or_default();

        assert_eq!(
            rendered,
            "(requestId: 5, messageType: 0x00000010, handle: 0x8000000000000000)"
        );
    }

    proptest! {
        #[test]
        fn live_handles_stay_unique(ops in proptest::collection::vec(any::<bool>(), 1..200)) {
            let mut registry = SyntheticRegistry::new();
            let mut live: Vec<MessageHandle> = Vec::new();

            for create in ops {
                if create || live.is_empty() {
                    let (_, handle) = registry.create(KIND);
                    prop_assert!(!live.contains(&handle));
                    live.push(handle);
                } else {
                    let handle = live.remove(0);
                    prop_assert!(registry.remove_and_release(handle).is_ok());
                }
                prop_assert_eq!(registry.len(), live.len());
            }
        }
    }
}
