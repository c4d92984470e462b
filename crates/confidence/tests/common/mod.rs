#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use confidence_sdk::telemetry::proto::Monitoring;
use confidence_sdk::telemetry::proto::library_traces::trace::Trace as TraceKind;
use confidence_sdk::telemetry::{TELEMETRY_HEADER, TraceStatus};
use confidence_sdk::{Confidence, ConfidenceOptions, Telemetry};
use prost::Message;
use serde_json::{Value, json};
use wiremock::Request;

pub const CLIENT_SECRET: &str = "test-secret";

pub fn resolved(flag: &str, variant: &str, value: Value) -> Value {
    json!({
        "resolvedFlags": [{
            "flag": format!("flags/{}", flag),
            "variant": variant,
            "value": value
        }],
        "resolveToken": "token"
    })
}

pub fn options(base_url: &str, telemetry: Arc<Telemetry>) -> ConfidenceOptions {
    ConfidenceOptions::default()
        .with_resolve_base_url(base_url)
        .with_event_base_url(base_url)
        .with_timeout_ms(2_000)
        .with_telemetry(telemetry)
}

pub fn client(base_url: &str) -> Confidence {
    Confidence::new(
        CLIENT_SECRET,
        options(base_url, Arc::new(Telemetry::new("1.0.0", false))),
    )
    .unwrap()
}

pub fn telemetry_header(request: &Request) -> Option<String> {
    request
        .headers
        .get(TELEMETRY_HEADER)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Statuses of the traces carried by an encoded telemetry header.
pub fn trace_statuses(header: &str) -> Vec<TraceStatus> {
    let monitoring = Monitoring::decode(STANDARD.decode(header).unwrap().as_slice()).unwrap();
    monitoring.library_traces[0]
        .traces
        .iter()
        .map(|t| match t.trace {
            Some(TraceKind::RequestTrace(request_trace)) => request_trace.status(),
            None => panic!("trace without request trace"),
        })
        .collect()
}

pub fn body_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}
