//! In-memory stand-in for the real platform backend.
//!
//! [`RecordingPlatform`] behaves like a small, well-behaved backend: it issues
//! ascending request ids from 1, hands out address-like handles, serves a FIFO
//! queue of genuine messages and records every call that reaches it. Put it behind
//! a `SyntheticPlatform` to see exactly which calls were forwarded.

use platform_shim_core::{AccountAgeCategory, MessageHandle, MessageType, PlatformApi, RequestId};
use std::collections::{HashMap, VecDeque};

/// First handle value handed out. Looks like a heap address in the lower half.
const FIRST_HANDLE: u64 = 0x0000_7f00_0000_1000;

/// Distance between consecutive handles.
const HANDLE_STRIDE: u64 = 0x40;

/// A call that reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardedCall {
    /// `request_age_category()`
    RequestAgeCategory,
    /// `pop_message()`
    PopMessage,
    /// `message_type(handle)`
    MessageType(MessageHandle),
    /// `native_message(handle)`
    NativeMessage(MessageHandle),
    /// `age_category_result(handle)`
    AgeCategoryResult(MessageHandle),
    /// `age_category(handle)`
    AgeCategory(MessageHandle),
    /// `is_error(handle)`
    IsError(MessageHandle),
    /// `request_id(handle)`
    RequestId(MessageHandle),
    /// `free_message(handle)`
    FreeMessage(MessageHandle),
}

/// A message produced by the backend itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenuineMessage {
    /// Handle the client sees.
    pub handle: MessageHandle,
    /// Request the message answers.
    pub request_id: RequestId,
    /// Kind of message.
    pub message_type: MessageType,
    /// Age category carried by the message, if it has one.
    pub age_category: AccountAgeCategory,
    /// Whether the request failed.
    pub is_error: bool,
}

/// Recording fake of the real platform backend.
///
/// # Example
///
/// ```
/// use platform_shim_core::{MessageType, PlatformApi};
/// use platform_shim_testing::{ForwardedCall, RecordingPlatform};
///
/// let mut backend = RecordingPlatform::new();
/// let (request_id, handle) = backend.enqueue(MessageType::new(0x99), false);
///
/// assert_eq!(backend.pop_message(), handle);
/// assert_eq!(backend.request_id(handle), request_id);
/// assert!(backend.pop_message().is_null());
/// assert_eq!(backend.calls()[0], ForwardedCall::PopMessage);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingPlatform {
    queue: VecDeque<MessageHandle>,
    messages: HashMap<MessageHandle, GenuineMessage>,
    calls: Vec<ForwardedCall>,
    next_request_id: u64,
    next_handle: u64,
    age_category: AccountAgeCategory,
}

impl RecordingPlatform {
    /// Create a backend with an empty queue that answers age category
    /// requests with `AccountAgeCategory::Child`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_age_category(AccountAgeCategory::Child)
    }

    /// Create a backend whose genuine age category answers carry `age_category`.
    #[must_use]
    pub fn with_age_category(age_category: AccountAgeCategory) -> Self {
        Self {
            queue: VecDeque::new(),
            messages: HashMap::new(),
            calls: Vec::new(),
            next_request_id: 1,
            next_handle: FIRST_HANDLE,
            age_category,
        }
    }

    /// Queue a genuine completed message of kind `message_type`.
    ///
    /// The message carries no age category. Returns its request id and handle.
    pub fn enqueue(&mut self, message_type: MessageType, is_error: bool) -> (RequestId, MessageHandle) {
        self.push_message(message_type, AccountAgeCategory::Unknown, is_error)
    }

    /// Calls that reached the backend, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[ForwardedCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<ForwardedCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of genuine messages waiting to be popped.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Number of genuine messages not yet freed.
    #[must_use]
    pub fn live_messages(&self) -> usize {
        self.messages.len()
    }

    /// Look up a genuine message without recording a call.
    #[must_use]
    pub fn message(&self, handle: MessageHandle) -> Option<&GenuineMessage> {
        self.messages.get(&handle)
    }

    fn push_message(
        &mut self,
        message_type: MessageType,
        age_category: AccountAgeCategory,
        is_error: bool,
    ) -> (RequestId, MessageHandle) {
        let request_id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;

        let handle = MessageHandle::new(self.next_handle);
        self.next_handle += HANDLE_STRIDE;

        self.messages.insert(
            handle,
            GenuineMessage {
                handle,
                request_id,
                message_type,
                age_category,
                is_error,
            },
        );
        self.queue.push_back(handle);
        (request_id, handle)
    }
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformApi for RecordingPlatform {
    fn request_age_category(&mut self) -> RequestId {
        self.calls.push(ForwardedCall::RequestAgeCategory);
        let age_category = self.age_category;
        let (request_id, _) =
            self.push_message(MessageType::USER_AGE_CATEGORY_GET, age_category, false);
        request_id
    }

    fn pop_message(&mut self) -> MessageHandle {
        self.calls.push(ForwardedCall::PopMessage);
        self.queue.pop_front().unwrap_or(MessageHandle::NULL)
    }

    fn message_type(&mut self, message: MessageHandle) -> MessageType {
        self.calls.push(ForwardedCall::MessageType(message));
        self.messages
            .get(&message)
            .map_or(MessageType::UNKNOWN, |m| m.message_type)
    }

    fn native_message(&mut self, message: MessageHandle) -> MessageHandle {
        self.calls.push(ForwardedCall::NativeMessage(message));
        if self.messages.contains_key(&message) {
            message
        } else {
            MessageHandle::NULL
        }
    }

    fn age_category_result(&mut self, message: MessageHandle) -> MessageHandle {
        self.calls.push(ForwardedCall::AgeCategoryResult(message));
        if self.messages.contains_key(&message) {
            message
        } else {
            MessageHandle::NULL
        }
    }

    fn age_category(&mut self, result: MessageHandle) -> AccountAgeCategory {
        self.calls.push(ForwardedCall::AgeCategory(result));
        self.messages
            .get(&result)
            .map_or(AccountAgeCategory::Unknown, |m| m.age_category)
    }

    fn is_error(&mut self, message: MessageHandle) -> bool {
        self.calls.push(ForwardedCall::IsError(message));
        self.messages.get(&message).is_none_or(|m| m.is_error)
    }

    fn request_id(&mut self, message: MessageHandle) -> RequestId {
        self.calls.push(ForwardedCall::RequestId(message));
        self.messages
            .get(&message)
            .map_or(RequestId::INVALID, |m| m.request_id)
    }

    fn free_message(&mut self, message: MessageHandle) {
        self.calls.push(ForwardedCall::FreeMessage(message));
        self.queue.retain(|queued| *queued != message);
        self.messages.remove(&message);
    }
}
