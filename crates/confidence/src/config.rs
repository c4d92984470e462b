//! # Client Configuration
//!
//! Options read once when a [`crate::Confidence`] client is built.
//!
//! ## Environment Variables
//!
//! [`ConfidenceOptions::default`] honours:
//!
//! * `CONFIDENCE_REGION` - `eu`, `us` or `global` (default `global`)
//! * `CONFIDENCE_RESOLVE_BASE_URL` - overrides the regional resolver URL
//! * `CONFIDENCE_EVENT_BASE_URL` - overrides the event publishing URL
//! * `CONFIDENCE_TIMEOUT_MS` - per request timeout (default 10000)
//! * `CONFIDENCE_DISABLE_TELEMETRY` - `true` or `1` to stop sending telemetry
//!
//! ## Example
//!
//! ```rust
//! use confidence_sdk::{ConfidenceOptions, Region};
//!
//! let options = ConfidenceOptions::default()
//!     .with_region(Region::Eu)
//!     .with_timeout_ms(500);
//! assert_eq!(options.timeout.as_millis(), 500);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::telemetry::Telemetry;

pub const EU_RESOLVE_API_ENDPOINT: &str = "https://resolver.eu.confidence.dev";
pub const US_RESOLVE_API_ENDPOINT: &str = "https://resolver.us.confidence.dev";
pub const GLOBAL_RESOLVE_API_ENDPOINT: &str = "https://resolver.confidence.dev";
pub const EVENTS_API_ENDPOINT: &str = "https://events.confidence.dev";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Regional resolver deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    Eu,
    Us,
    #[default]
    Global,
}

impl Region {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Region::Eu => EU_RESOLVE_API_ENDPOINT,
            Region::Us => US_RESOLVE_API_ENDPOINT,
            Region::Global => GLOBAL_RESOLVE_API_ENDPOINT,
        }
    }
}

impl<'a> From<&'a str> for Region {
    fn from(s: &'a str) -> Self {
        match s.to_lowercase().as_str() {
            "eu" => Region::Eu,
            "us" => Region::Us,
            _ => Region::Global,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Eu => write!(f, "eu"),
            Region::Us => write!(f, "us"),
            Region::Global => write!(f, "global"),
        }
    }
}

/// Options for a [`crate::Confidence`] client.
#[derive(Debug, Clone)]
pub struct ConfidenceOptions {
    /// Resolver region, ignored when `custom_resolve_base_url` is set
    /// Default: global
    pub region: Region,
    /// Ask the resolver to apply (log exposure of) the flags it resolves
    /// Default: true
    pub apply_on_resolve: bool,
    /// Resolver base URL overriding the region, e.g. `http://localhost:8080`
    pub custom_resolve_base_url: Option<String>,
    /// Event publishing base URL
    pub custom_event_base_url: Option<String>,
    /// Timeout applied to each HTTP request
    /// Default: 10 seconds
    pub timeout: Duration,
    /// Stop recording and sending resolve telemetry
    /// Default: false
    pub disable_telemetry: bool,
    /// Batcher to report into instead of the process-wide one
    pub telemetry: Option<Arc<Telemetry>>,
}

impl Default for ConfidenceOptions {
    fn default() -> Self {
        let region = std::env::var("CONFIDENCE_REGION")
            .map(|s| Region::from(s.as_str()))
            .unwrap_or_default();

        let timeout = std::env::var("CONFIDENCE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS));

        let disable_telemetry = std::env::var("CONFIDENCE_DISABLE_TELEMETRY")
            .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        Self {
            region,
            apply_on_resolve: true,
            custom_resolve_base_url: std::env::var("CONFIDENCE_RESOLVE_BASE_URL").ok(),
            custom_event_base_url: std::env::var("CONFIDENCE_EVENT_BASE_URL").ok(),
            timeout,
            disable_telemetry,
            telemetry: None,
        }
    }
}

impl ConfidenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_apply_on_resolve(mut self, apply: bool) -> Self {
        self.apply_on_resolve = apply;
        self
    }

    pub fn with_resolve_base_url(mut self, url: impl Into<String>) -> Self {
        self.custom_resolve_base_url = Some(url.into());
        self
    }

    pub fn with_event_base_url(mut self, url: impl Into<String>) -> Self {
        self.custom_event_base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn with_telemetry_disabled(mut self, disabled: bool) -> Self {
        self.disable_telemetry = disabled;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Base URL for flag resolution after applying the custom override.
    pub fn resolve_base_url(&self) -> &str {
        self.custom_resolve_base_url
            .as_deref()
            .unwrap_or(self.region.endpoint())
    }

    pub fn event_base_url(&self) -> &str {
        self.custom_event_base_url
            .as_deref()
            .unwrap_or(EVENTS_API_ENDPOINT)
    }
}
