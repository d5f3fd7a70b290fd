//! # Platform Shim Runtime
//!
//! Dispatch-table implementations built on `platform-shim-core`.
//!
//! - [`SyntheticPlatform`]: decorator that fabricates age category requests and
//!   forwards every other call to the real backend
//! - [`SharedPlatform`]: mutex wrapper for hosts that call in from several threads
//! - [`metrics`]: counters for synthesised and forwarded calls
//!
//! The bootstrap layer chooses the active table. Installing the shim means
//! replacing the real backend with `SyntheticPlatform::new(real, config)`;
//! uninstalling means calling [`SyntheticPlatform::into_inner`].
//!
//! ## Example
//!
//! ```ignore
//! use platform_shim_core::{PlatformApi, ShimConfig};
//! use platform_shim_runtime::SyntheticPlatform;
//!
//! let mut active: Box<dyn PlatformApi> =
//!     Box::new(SyntheticPlatform::new(real_backend, ShimConfig::default()));
//!
//! let request_id = active.request_age_category();
//! let message = active.pop_message();
//! assert!(!active.is_error(message));
//! assert_eq!(active.request_id(message), request_id);
//! active.free_message(message);
//! ```

pub mod metrics;
pub mod shared;
pub mod synthetic;

pub use shared::SharedPlatform;
pub use synthetic::SyntheticPlatform;
