//! Confidence SDK for Rust
//!
//! A client for the Confidence remote flag resolver. Resolving a flag always
//! returns a usable value: network failures, missing flags and type
//! mismatches fall back to the caller's default and are described by the
//! returned [`FlagResolutionDetails`].
//!
//! # Overview
//!
//! * [`Confidence`] resolves flags in blocking or async form and publishes
//!   tracking events.
//! * [`EvaluationContext`] holds the attributes the resolver targets on.
//!   Derived handles overlay new attributes without touching their parent.
//! * [`telemetry::Telemetry`] batches resolve latency traces and attaches them
//!   to the next resolve request.
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! confidence-sdk = "0.1"
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use confidence_sdk::{Confidence, ConfidenceOptions, EvaluationContext, Region};
//!
//! #[tokio::main]
//! async fn main() {
//!     let confidence = Confidence::new(
//!         "your-client-secret",
//!         ConfidenceOptions::default().with_region(Region::Eu),
//!     )
//!     .unwrap();
//!
//!     let user = confidence.with_context(
//!         EvaluationContext::new()
//!             .with_targeting_key("user-123")
//!             .with_field("plan", "premium"),
//!     );
//!
//!     // Resolve a nested value of the `checkout` flag
//!     let details = user
//!         .resolve_string_details_async("checkout.button.color", "blue")
//!         .await;
//!     println!("color = {} ({})", details.value, details.reason);
//!
//!     user.track_async("checkout-started", Default::default());
//! }
//! ```
//!
//! # Configuration
//!
//! See [`ConfidenceOptions`] for the available options and the environment
//! variables read by its `Default` implementation.

mod client;
pub mod config;
mod context;
mod details;
mod error;
pub mod names;
pub mod selector;
pub mod telemetry;
pub mod value;

pub use client::Confidence;
pub use config::{ConfidenceOptions, Region};
pub use context::EvaluationContext;
pub use details::{FLAG_KEY_METADATA, FlagResolutionDetails, Reason, ResolveResult};
pub use error::{ConfidenceError, ErrorCode};
pub use names::{FlagName, VariantName};
pub use telemetry::Telemetry;
pub use value::{FieldValue, FlagValue, Object, ValueType};

/// Version reported to the resolver and in telemetry.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
