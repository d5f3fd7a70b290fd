//! Counters for synthesised and forwarded platform calls.
//!
//! Metrics go through the `metrics` facade. Nothing is recorded unless the host
//! installs a recorder; call [`register_metrics`] once after installing it to
//! attach descriptions.
//!
//! - `platform_shim_synthesized_total{entry_point}`: calls answered from the registry
//! - `platform_shim_forwarded_total{entry_point}`: calls passed to the real backend
//! - `platform_shim_live_requests`: fabricated requests not yet freed

use metrics::{describe_counter, describe_gauge};
use std::fmt;

/// Calls answered from fabricated data.
pub const SYNTHESIZED_TOTAL: &str = "platform_shim_synthesized_total";

/// Calls forwarded to the real backend.
pub const FORWARDED_TOTAL: &str = "platform_shim_forwarded_total";

/// Live fabricated requests.
pub const LIVE_REQUESTS: &str = "platform_shim_live_requests";

/// Intercepted entry point, used as the `entry_point` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `request_age_category`
    RequestAgeCategory,
    /// `pop_message`
    PopMessage,
    /// `message_type`
    MessageType,
    /// `native_message`
    NativeMessage,
    /// `age_category_result`
    AgeCategoryResult,
    /// `age_category`
    AgeCategory,
    /// `is_error`
    IsError,
    /// `request_id`
    RequestId,
    /// `free_message`
    FreeMessage,
}

impl EntryPoint {
    /// Label value for this entry point.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestAgeCategory => "request_age_category",
            Self::PopMessage => "pop_message",
            Self::MessageType => "message_type",
            Self::NativeMessage => "native_message",
            Self::AgeCategoryResult => "age_category_result",
            Self::AgeCategory => "age_category",
            Self::IsError => "is_error",
            Self::RequestId => "request_id",
            Self::FreeMessage => "free_message",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        SYNTHESIZED_TOTAL,
        "Total number of platform calls answered from fabricated requests"
    );
    describe_counter!(
        FORWARDED_TOTAL,
        "Total number of platform calls forwarded to the real backend"
    );
    describe_gauge!(
        LIVE_REQUESTS,
        "Number of fabricated requests that have not been freed"
    );
}

/// Count one call answered from a fabricated request.
pub(crate) fn record_synthesized(entry_point: EntryPoint) {
    metrics::counter!(SYNTHESIZED_TOTAL, "entry_point" => entry_point.as_str()).increment(1);
}

/// Count one call passed through to the real backend.
pub(crate) fn record_forwarded(entry_point: EntryPoint) {
    metrics::counter!(FORWARDED_TOTAL, "entry_point" => entry_point.as_str()).increment(1);
}

/// Publish the number of fabricated requests not yet freed.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn set_live_requests(count: usize) {
    metrics::gauge!(LIVE_REQUESTS).set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    #[test]
    fn entry_point_labels_are_distinct() {
        let all = [
            EntryPoint::RequestAgeCategory,
            EntryPoint::PopMessage,
            EntryPoint::MessageType,
            EntryPoint::NativeMessage,
            EntryPoint::AgeCategoryResult,
            EntryPoint::AgeCategory,
            EntryPoint::IsError,
            EntryPoint::RequestId,
            EntryPoint::FreeMessage,
        ];
        let mut labels: Vec<_> = all.iter().map(|e| e.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), all.len());
    }

    #[test]
    fn helpers_record_under_entry_point_label() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            register_metrics();
            record_synthesized(EntryPoint::PopMessage);
            record_synthesized(EntryPoint::PopMessage);
            record_forwarded(EntryPoint::FreeMessage);
            set_live_requests(3);
        });

        let mut synthesized = None;
        let mut forwarded = None;
        let mut live = None;
        for (key, _, _, value) in snapshotter.snapshot().into_vec() {
            let key = key.key();
            let label = key
                .labels()
                .find(|label| label.key() == "entry_point")
                .map(|label| label.value().to_string());
            match (key.name(), value) {
                (SYNTHESIZED_TOTAL, DebugValue::Counter(count)) => synthesized = Some((label, count)),
                (FORWARDED_TOTAL, DebugValue::Counter(count)) => forwarded = Some((label, count)),
                (LIVE_REQUESTS, DebugValue::Gauge(value)) => live = Some(value.0),
                _ => {}
            }
        }

        assert_eq!(synthesized, Some((Some("pop_message".to_string()), 2)));
        assert_eq!(forwarded, Some((Some("free_message".to_string()), 1)));
        assert_eq!(live, Some(3.0));
    }
}
