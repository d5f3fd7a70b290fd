//! # Platform Shim Core
//!
//! Data model and bookkeeping for fabricating platform requests.
//!
//! The platform exposes an asynchronous request/response API: a client starts a
//! request and receives a [`RequestId`], polls a queue for completed messages,
//! queries each [`MessageHandle`] for its payload and finally frees it. This crate
//! provides everything needed to answer one family of those requests without ever
//! contacting the real backend:
//!
//! - [`PlatformApi`]: one method per intercepted entry point (the dispatch table)
//! - [`IdAllocator`]: request ids counted down from `u64::MAX`
//! - [`HandleAllocator`]: opaque handles in a namespace disjoint from genuine ones
//! - [`SyntheticRegistry`]: the ordered table of live fabricated requests
//! - [`ShimConfig`]: which message kind is fabricated and what it resolves to
//!
//! The decorator that routes calls between the registry and the real backend lives
//! in `platform-shim-runtime`.
//!
//! ## Example
//!
//! ```
//! use platform_shim_core::{MessageType, SyntheticRegistry};
//!
//! let mut registry = SyntheticRegistry::new();
//! let (request_id, handle) = registry.create(MessageType::USER_AGE_CATEGORY_GET);
//!
//! assert_eq!(request_id.value(), u64::MAX);
//! assert!(registry.find_by_handle(handle).is_some());
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod id;
pub mod message;
pub mod platform;
pub mod registry;

pub use config::ShimConfig;
pub use error::{Result, ShimError};
pub use handle::{HandleAllocator, SYNTHETIC_HANDLE_TAG};
pub use id::IdAllocator;
pub use message::{AccountAgeCategory, MessageHandle, MessageType, RequestId};
pub use platform::PlatformApi;
pub use registry::{Descriptor, SyntheticRegistry};
