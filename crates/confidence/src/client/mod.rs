//! # Resolution Client
//!
//! [`Confidence`] resolves flags against the remote resolver and folds every
//! failure into a [`FlagResolutionDetails`] holding the caller's default.
//!
//! Every typed operation comes in a blocking form and an `_async` form. Both
//! build the same request, apply the same per-request timeout and interpret
//! the response the same way.
//!
//! ## Flag keys
//!
//! A flag key is `{flag}` or `{flag}.{path}`. The part before the first `.`
//! names the flag; the rest is a dot path into the resolved value:
//!
//! ```text
//! "checkout"                  -> whole value of flags/checkout
//! "checkout.button.color"     -> value["button"]["color"]
//! ```
//!
//! ## Blocking use
//!
//! The blocking forms drive their own HTTP client. Called from inside a tokio
//! runtime they run the request on a separate thread and block the caller
//! until it finishes, so prefer the `_async` forms there.

mod events;
mod transport;

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tokio::runtime::Handle;
use tracing::{Level, debug, error, info, instrument, warn};
use url::Url;

use crate::config::ConfidenceOptions;
use crate::context::EvaluationContext;
use crate::details::{FlagResolutionDetails, ResolveResult};
use crate::error::ConfidenceError;
use crate::names::{FlagName, VariantName};
use crate::selector::select;
use crate::telemetry::{TELEMETRY_HEADER, Telemetry, TraceId, TraceStatus};
use crate::value::{FieldValue, FlagValue, Object};

use transport::{EVENTS_PATH, RESOLVE_PATH, ResolveRequest, Sdk, parse_resolve_response};

struct Shared {
    client_secret: String,
    apply_on_resolve: bool,
    resolve_url: String,
    events_url: String,
    timeout: Duration,
    http: reqwest::Client,
    blocking_http: OnceLock<reqwest::blocking::Client>,
    telemetry: Arc<Telemetry>,
}

impl Shared {
    fn blocking_http(&self) -> Result<&reqwest::blocking::Client, ConfidenceError> {
        if let Some(client) = self.blocking_http.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(self.blocking_http.get_or_init(|| client))
    }

    fn telemetry_header(&self) -> Option<String> {
        Some(self.telemetry.monitoring_header()).filter(|header| !header.is_empty())
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // The blocking client owns a runtime that cannot be dropped from
        // within another one.
        if let Some(client) = self.blocking_http.take() {
            if Handle::try_current().is_ok() {
                std::thread::spawn(move || drop(client));
            }
        }
    }
}

/// Runs `f` where blocking I/O is allowed.
///
/// Outside a tokio runtime `f` runs on the calling thread. Inside one it runs
/// on a scoped thread that the caller waits for.
pub(crate) fn outside_runtime<R: Send>(
    f: impl FnOnce() -> R + Send,
) -> Result<R, ConfidenceError> {
    if Handle::try_current().is_err() {
        return Ok(f());
    }
    debug!("Blocking call inside an async runtime, running it on a separate thread");
    std::thread::scope(|scope| scope.spawn(f).join()).map_err(|_| {
        ConfidenceError::General("blocking request thread panicked".to_string())
    })
}

/// Handle to the Confidence resolver.
///
/// Cloning is cheap. Clones and handles derived with
/// [`Confidence::with_context`] share the HTTP clients and telemetry batcher.
#[derive(Clone)]
pub struct Confidence {
    inner: Arc<Shared>,
    context: Arc<EvaluationContext>,
}

impl fmt::Debug for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Confidence")
            .field("resolve_url", &self.inner.resolve_url)
            .field("events_url", &self.inner.events_url)
            .field("apply_on_resolve", &self.inner.apply_on_resolve)
            .field("timeout", &self.inner.timeout)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Confidence {
    /// Creates a client for `client_secret`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfidenceError::Config`] when the secret is empty or a
    /// custom base URL is not a valid http(s) URL.
    pub fn new(
        client_secret: impl Into<String>,
        options: ConfidenceOptions,
    ) -> Result<Self, ConfidenceError> {
        let client_secret = client_secret.into();
        if client_secret.is_empty() {
            return Err(ConfidenceError::Config(
                "client secret must not be empty".to_string(),
            ));
        }

        let resolve_url = endpoint(options.resolve_base_url(), RESOLVE_PATH)?;
        let events_url = endpoint(options.event_base_url(), EVENTS_PATH)?;

        let telemetry = options
            .telemetry
            .clone()
            .unwrap_or_else(|| Telemetry::global(crate::SDK_VERSION, options.disable_telemetry));

        debug!(
            resolve_url = %resolve_url,
            region = %options.region,
            timeout_ms = options.timeout.as_millis() as u64,
            "Creating Confidence client"
        );

        Ok(Self {
            inner: Arc::new(Shared {
                client_secret,
                apply_on_resolve: options.apply_on_resolve,
                resolve_url,
                events_url,
                timeout: options.timeout,
                http: reqwest::Client::builder().build()?,
                blocking_http: OnceLock::new(),
                telemetry,
            }),
            context: Arc::new(EvaluationContext::new()),
        })
    }

    /// Returns a handle whose context is this handle's context overlaid by
    /// `context`. This handle is left untouched.
    pub fn with_context(&self, context: impl Into<EvaluationContext>) -> Confidence {
        Confidence {
            inner: Arc::clone(&self.inner),
            context: Arc::new(self.context.merged(&context.into())),
        }
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    pub fn telemetry(&self) -> &Arc<Telemetry> {
        &self.inner.telemetry
    }

    pub fn resolve_boolean_details(
        &self,
        flag_key: &str,
        default_value: bool,
    ) -> FlagResolutionDetails<bool> {
        self.resolve_details(flag_key, default_value)
    }

    pub fn resolve_integer_details(
        &self,
        flag_key: &str,
        default_value: i64,
    ) -> FlagResolutionDetails<i64> {
        self.resolve_details(flag_key, default_value)
    }

    pub fn resolve_float_details(
        &self,
        flag_key: &str,
        default_value: f64,
    ) -> FlagResolutionDetails<f64> {
        self.resolve_details(flag_key, default_value)
    }

    pub fn resolve_string_details(
        &self,
        flag_key: &str,
        default_value: impl Into<String>,
    ) -> FlagResolutionDetails<String> {
        self.resolve_details(flag_key, default_value.into())
    }

    pub fn resolve_object_details(
        &self,
        flag_key: &str,
        default_value: Object,
    ) -> FlagResolutionDetails<Object> {
        self.resolve_details(flag_key, default_value)
    }

    pub async fn resolve_boolean_details_async(
        &self,
        flag_key: &str,
        default_value: bool,
    ) -> FlagResolutionDetails<bool> {
        self.resolve_details_async(flag_key, default_value).await
    }

    pub async fn resolve_integer_details_async(
        &self,
        flag_key: &str,
        default_value: i64,
    ) -> FlagResolutionDetails<i64> {
        self.resolve_details_async(flag_key, default_value).await
    }

    pub async fn resolve_float_details_async(
        &self,
        flag_key: &str,
        default_value: f64,
    ) -> FlagResolutionDetails<f64> {
        self.resolve_details_async(flag_key, default_value).await
    }

    pub async fn resolve_string_details_async(
        &self,
        flag_key: &str,
        default_value: impl Into<String>,
    ) -> FlagResolutionDetails<String> {
        self.resolve_details_async(flag_key, default_value.into())
            .await
    }

    pub async fn resolve_object_details_async(
        &self,
        flag_key: &str,
        default_value: Object,
    ) -> FlagResolutionDetails<Object> {
        self.resolve_details_async(flag_key, default_value).await
    }

    /// Resolves `flag_key` on the calling thread.
    #[instrument(skip(self, default_value), fields(flag_key = %flag_key))]
    pub fn resolve_details<T: FlagValue>(
        &self,
        flag_key: &str,
        default_value: T,
    ) -> FlagResolutionDetails<T> {
        debug!("Resolving flag");
        let (flag_id, path) = split_flag_key(flag_key);
        let flag_name = FlagName::new(flag_id).to_string();

        let started = Instant::now();
        let resolved = outside_runtime(|| self.send_resolve_blocking(&flag_name))
            .and_then(|resolved| resolved);
        self.record_trace(started, &resolved);

        self.evaluate(flag_key, &flag_name, path, default_value, resolved)
    }

    /// Resolves `flag_key` without blocking the calling task.
    #[instrument(skip(self, default_value), fields(flag_key = %flag_key))]
    pub async fn resolve_details_async<T: FlagValue>(
        &self,
        flag_key: &str,
        default_value: T,
    ) -> FlagResolutionDetails<T> {
        debug!("Resolving flag");
        let (flag_id, path) = split_flag_key(flag_key);
        let flag_name = FlagName::new(flag_id).to_string();

        let started = Instant::now();
        let resolved = self.send_resolve(&flag_name).await;
        self.record_trace(started, &resolved);

        self.evaluate(flag_key, &flag_name, path, default_value, resolved)
    }

    fn resolve_request<'a>(&'a self, flag_name: &str) -> ResolveRequest<'a> {
        ResolveRequest {
            client_secret: &self.inner.client_secret,
            evaluation_context: &self.context,
            apply: self.inner.apply_on_resolve,
            flags: vec![flag_name.to_string()],
            sdk: Sdk::current(),
        }
    }

    fn send_resolve_blocking(&self, flag_name: &str) -> Result<ResolveResult, ConfidenceError> {
        let http = self.inner.blocking_http()?;
        let mut request = http
            .post(&self.inner.resolve_url)
            .timeout(self.inner.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&self.resolve_request(flag_name));
        if let Some(header) = self.inner.telemetry_header() {
            request = request.header(TELEMETRY_HEADER, header);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.bytes()?;
        self.finish_resolve(flag_name, status, &body)
    }

    async fn send_resolve(&self, flag_name: &str) -> Result<ResolveResult, ConfidenceError> {
        let mut request = self
            .inner
            .http
            .post(&self.inner.resolve_url)
            .timeout(self.inner.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&self.resolve_request(flag_name));
        if let Some(header) = self.inner.telemetry_header() {
            request = request.header(TELEMETRY_HEADER, header);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        self.finish_resolve(flag_name, status, &body)
    }

    fn finish_resolve(
        &self,
        flag_name: &str,
        status: StatusCode,
        body: &[u8],
    ) -> Result<ResolveResult, ConfidenceError> {
        let result = parse_resolve_response(flag_name, status, body)?;
        if tracing::enabled!(Level::DEBUG) {
            self.log_resolve_tester_hint(flag_name);
        }
        Ok(result)
    }

    /// Logs a payload that can be pasted into the resolve tester.
    fn log_resolve_tester_hint(&self, flag_name: &str) {
        let payload = serde_json::json!({
            "flag": flag_name,
            "context": &*self.context,
            "clientKey": &self.inner.client_secret,
        });
        match serde_json::to_vec(&payload) {
            Ok(json) => debug!(
                flag = flag_name,
                payload = %STANDARD.encode(json),
                "Check your flag evaluation by copying the payload to the resolve tester"
            ),
            Err(e) => debug!(error = %e, "Failed to encode resolve tester payload"),
        }
    }

    fn record_trace(&self, started: Instant, resolved: &Result<ResolveResult, ConfidenceError>) {
        let status = match resolved {
            Ok(_) => TraceStatus::Success,
            Err(ConfidenceError::Timeout(_)) => TraceStatus::Timeout,
            Err(_) => TraceStatus::Error,
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.inner
            .telemetry
            .add_trace(TraceId::ResolveLatency, duration_ms, status);
    }

    fn evaluate<T: FlagValue>(
        &self,
        flag_key: &str,
        flag_name: &str,
        path: Option<&str>,
        default_value: T,
        resolved: Result<ResolveResult, ConfidenceError>,
    ) -> FlagResolutionDetails<T> {
        match resolved.and_then(|result| select_value::<T>(result, path)) {
            Ok(Some((value, variant))) => {
                debug!(variant = %variant, "Flag evaluated");
                FlagResolutionDetails::targeting_match(
                    flag_key,
                    value.unwrap_or(default_value),
                    variant,
                )
            }
            Ok(None) => {
                debug!("No variant assigned, using default value");
                FlagResolutionDetails::default_value(flag_key, default_value)
            }
            Err(e) => {
                match &e {
                    ConfidenceError::FlagNotFound(_) => {
                        info!("Flag {} not found", flag_name)
                    }
                    ConfidenceError::Timeout(_) => {
                        warn!(error = %e, "Resolve timed out, using default value")
                    }
                    _ => error!(error = %e, "Failed to resolve flag, using default value"),
                }
                FlagResolutionDetails::from_error(flag_key, default_value, &e)
            }
        }
    }
}

/// Picks the typed value out of a resolver answer.
///
/// `Ok(None)` means no variant was assigned. A matched variant whose selected
/// value is null returns `Some((None, variant))`.
fn select_value<T: FlagValue>(
    result: ResolveResult,
    path: Option<&str>,
) -> Result<Option<(Option<T>, String)>, ConfidenceError> {
    let Some(variant) = result.variant else {
        return Ok(None);
    };
    let value = result.value.unwrap_or_default();
    if matches!(&value, FieldValue::String(s) if s.is_empty()) {
        return Ok(None);
    }

    let variant = VariantName::parse(&variant)?;
    let selected = select(&value, path, T::VALUE_TYPE)?
        .map(|v| {
            T::from_field_value(v).ok_or_else(|| {
                ConfidenceError::TypeMismatch(format!("value is not a {}", T::VALUE_TYPE))
            })
        })
        .transpose()?;

    Ok(Some((selected, variant.variant)))
}

fn split_flag_key(flag_key: &str) -> (&str, Option<&str>) {
    match flag_key.split_once('.') {
        Some((flag, path)) => (flag, Some(path)),
        None => (flag_key, None),
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<String, ConfidenceError> {
    let url = Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfidenceError::Config(format!(
            "unsupported URL scheme '{}' in {}",
            url.scheme(),
            base_url
        )));
    }
    Ok(format!("{}{}", base_url.trim_end_matches('/'), path))
}
