//! # Resolve Telemetry
//!
//! Collects one trace per resolve attempt and ships the pending traces to the
//! resolver in the `X-CONFIDENCE-TELEMETRY` header of the next request.
//!
//! ## Features
//!
//! * Process-wide batcher with first-wins version and disabled flag
//! * Safe under concurrent producers
//! * At-most-once delivery; draining empties the queue
//! * Compact protobuf + base64 header encoding
//!
//! ## Example
//!
//! ```rust
//! use confidence_sdk::telemetry::{Telemetry, TraceId, TraceStatus};
//!
//! let telemetry = Telemetry::new("1.0.0", false);
//! telemetry.add_trace(TraceId::ResolveLatency, 42, TraceStatus::Success);
//! let header = telemetry.monitoring_header();
//! assert!(!header.is_empty());
//! ```

pub mod proto;

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prost::Message;
use tracing::debug;

use proto::library_traces::trace::{self, RequestTrace};
use proto::library_traces::{Library, Trace};
use proto::{LibraryTraces, Monitoring, Platform};

pub use proto::library_traces::TraceId;
pub use proto::library_traces::trace::request_trace::Status as TraceStatus;

/// Name of the request header carrying the encoded batch.
pub const TELEMETRY_HEADER: &str = "X-CONFIDENCE-TELEMETRY";

static GLOBAL: OnceLock<Arc<Telemetry>> = OnceLock::new();

/// One recorded resolve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub trace_id: TraceId,
    pub duration_ms: u64,
    pub status: TraceStatus,
}

impl From<TraceEvent> for Trace {
    fn from(event: TraceEvent) -> Self {
        Trace {
            id: event.trace_id.into(),
            trace: Some(trace::Trace::RequestTrace(RequestTrace {
                millisecond_duration: event.duration_ms,
                status: event.status.into(),
            })),
        }
    }
}

/// Queue of pending resolve traces.
#[derive(Debug)]
pub struct Telemetry {
    version: String,
    disabled: bool,
    traces: Mutex<Vec<TraceEvent>>,
}

impl Telemetry {
    /// Creates an independent batcher. Most callers want [`Telemetry::global`].
    pub fn new(version: impl Into<String>, disabled: bool) -> Self {
        Self {
            version: version.into(),
            disabled,
            traces: Mutex::new(Vec::new()),
        }
    }

    /// Returns the process-wide batcher, creating it on first use.
    ///
    /// Only the first call decides the reported version and whether telemetry
    /// is disabled; later arguments are ignored.
    pub fn global(version: impl Into<String>, disabled: bool) -> Arc<Telemetry> {
        let version = version.into();
        Arc::clone(GLOBAL.get_or_init(|| {
            debug!(version = %version, disabled, "Initializing telemetry");
            Arc::new(Telemetry::new(version, disabled))
        }))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn add_trace(&self, trace_id: TraceId, duration_ms: u64, status: TraceStatus) {
        if self.disabled {
            return;
        }
        self.lock().push(TraceEvent {
            trace_id,
            duration_ms,
            status,
        });
    }

    /// Number of traces waiting for the next header.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Drains all pending traces into a base64 encoded `Monitoring` message.
    ///
    /// Returns an empty string when disabled. An empty queue still produces a
    /// valid batch with no traces.
    pub fn monitoring_header(&self) -> String {
        if self.disabled {
            return String::new();
        }
        let traces = std::mem::take(&mut *self.lock());

        let monitoring = Monitoring {
            library_traces: vec![LibraryTraces {
                library: Library::Confidence.into(),
                library_version: self.version.clone(),
                traces: traces.into_iter().map(Trace::from).collect(),
            }],
            platform: Platform::Rust.into(),
        };
        STANDARD.encode(monitoring.encode_to_vec())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TraceEvent>> {
        self.traces.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
