//! # Platform Shim Testing
//!
//! Testing utilities for the platform shim.
//!
//! This crate provides:
//! - [`RecordingPlatform`]: an in-memory backend that logs every call reaching it
//! - [`init_test_tracing`]: a `RUST_LOG`-aware subscriber for test output
//!
//! ## Example
//!
//! ```ignore
//! use platform_shim_core::{PlatformApi, ShimConfig};
//! use platform_shim_runtime::SyntheticPlatform;
//! use platform_shim_testing::{ForwardedCall, RecordingPlatform};
//!
//! #[test]
//! fn poll_falls_through_when_drained() {
//!     let mut platform = SyntheticPlatform::new(RecordingPlatform::new(), ShimConfig::default());
//!
//!     assert!(platform.pop_message().is_null());
//!     assert_eq!(platform.real().calls(), &[ForwardedCall::PopMessage]);
//! }
//! ```

use tracing_subscriber::EnvFilter;

pub mod recording;

pub use recording::{ForwardedCall, GenuineMessage, RecordingPlatform};

/// Install a test-friendly tracing subscriber.
///
/// Honours `RUST_LOG` (default `debug`) and writes through the test harness's
/// captured output. Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
