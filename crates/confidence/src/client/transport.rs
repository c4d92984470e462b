//! Wire types for the resolver and event endpoints.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::EvaluationContext;
use crate::details::ResolveResult;
use crate::error::ConfidenceError;
use crate::value::{FieldValue, Object};

pub(crate) const RESOLVE_PATH: &str = "/v1/flags:resolve";
pub(crate) const EVENTS_PATH: &str = "/v1/events:publish";

pub(crate) const SDK_ID: &str = "SDK_ID_RUST_CONFIDENCE";

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Sdk {
    pub id: &'static str,
    pub version: &'static str,
}

impl Sdk {
    pub fn current() -> Self {
        Self {
            id: SDK_ID,
            version: crate::SDK_VERSION,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResolveRequest<'a> {
    pub client_secret: &'a str,
    pub evaluation_context: &'a EvaluationContext,
    pub apply: bool,
    pub flags: Vec<String>,
    pub sdk: Sdk,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ResolveResponse {
    pub resolved_flags: Vec<ResolvedFlag>,
    pub resolve_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResolvedFlag {
    pub flag: String,
    pub variant: String,
    pub value: Option<FieldValue>,
}

/// Interprets a resolver response for a single flag request.
pub(crate) fn parse_resolve_response(
    flag_name: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<ResolveResult, ConfidenceError> {
    debug!(status = status.as_u16(), "Received response");

    if status == StatusCode::NOT_FOUND {
        return Err(ConfidenceError::FlagNotFound(flag_name.to_string()));
    }
    if !status.is_success() {
        return Err(ConfidenceError::General(format!(
            "resolver returned status {}",
            status
        )));
    }

    let response: ResolveResponse = serde_json::from_slice(body)?;
    let Some(resolved) = response.resolved_flags.into_iter().next() else {
        return Err(ConfidenceError::FlagNotFound(flag_name.to_string()));
    };

    debug!(flag = %resolved.flag, variant = %resolved.variant, "Flag resolved");
    Ok(ResolveResult {
        value: resolved.value,
        variant: Some(resolved.variant).filter(|v| !v.is_empty()),
        token: response.resolve_token,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublishRequest<'a> {
    pub client_secret: &'a str,
    pub send_time: String,
    pub events: Vec<Event>,
    pub sdk: Sdk,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Event {
    pub event_definition: String,
    pub payload: Object,
    pub event_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PublishResponse {
    pub errors: Vec<serde_json::Value>,
}
