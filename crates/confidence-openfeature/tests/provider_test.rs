use std::sync::Arc;

use confidence_sdk::{Confidence, ConfidenceOptions, Telemetry};
use open_feature::provider::FeatureProvider;
use open_feature::{EvaluationContext, EvaluationErrorCode, EvaluationReason, Value};
use open_feature_confidence::ConfidenceProvider;
use serde_json::json;
use test_log::test;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESOLVE_PATH: &str = "/v1/flags:resolve";

async fn setup_mock_server(response: ResponseTemplate) -> (MockServer, ConfidenceProvider) {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESOLVE_PATH))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    let confidence = Confidence::new(
        "secret",
        ConfidenceOptions::default()
            .with_resolve_base_url(mock_server.uri())
            .with_telemetry(Arc::new(Telemetry::new("1.0.0", true))),
    )
    .unwrap();
    (mock_server, ConfidenceProvider::new(confidence))
}

fn resolved(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "resolvedFlags": [{
            "flag": "flags/test-flag",
            "variant": "flags/test-flag/variants/treatment",
            "value": value
        }],
        "resolveToken": "token"
    }))
}

#[test(tokio::test)]
async fn test_metadata() {
    let (_server, provider) = setup_mock_server(ResponseTemplate::new(404)).await;
    assert_eq!(provider.metadata().name, "Confidence");
}

#[test(tokio::test)]
async fn test_resolve_values() {
    let (_server, provider) = setup_mock_server(resolved(json!({
        "enabled": true,
        "count": 4,
        "ratio": 0.25,
        "title": "hello",
        "style": {"color": "red", "unset": null}
    })))
    .await;
    let context = EvaluationContext::default().with_targeting_key("test-user");

    let result = provider
        .resolve_bool_value("test-flag.enabled", &context)
        .await
        .unwrap();
    assert!(result.value);
    assert_eq!(result.variant, Some("treatment".to_string()));
    assert_eq!(result.reason, Some(EvaluationReason::TargetingMatch));

    let result = provider
        .resolve_int_value("test-flag.count", &context)
        .await
        .unwrap();
    assert_eq!(result.value, 4);

    let result = provider
        .resolve_float_value("test-flag.ratio", &context)
        .await
        .unwrap();
    assert_eq!(result.value, 0.25);

    let result = provider
        .resolve_string_value("test-flag.title", &context)
        .await
        .unwrap();
    assert_eq!(result.value, "hello");

    let result = provider
        .resolve_struct_value("test-flag.style", &context)
        .await
        .unwrap();
    assert_eq!(result.value.fields.len(), 1);
    assert_eq!(
        result.value.fields.get("color"),
        Some(&Value::String("red".to_string()))
    );
}

#[test(tokio::test)]
async fn test_context_is_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESOLVE_PATH))
        .and(body_partial_json(json!({
            "flags": ["flags/test-flag"],
            "evaluationContext": {"targeting_key": "test-user", "country": "SE"}
        })))
        .respond_with(resolved(json!({"enabled": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let confidence = Confidence::new(
        "secret",
        ConfidenceOptions::default()
            .with_resolve_base_url(mock_server.uri())
            .with_telemetry(Arc::new(Telemetry::new("1.0.0", true))),
    )
    .unwrap();
    let provider = ConfidenceProvider::new(confidence);

    let context = EvaluationContext::default()
        .with_targeting_key("test-user")
        .with_custom_field("country", "SE");
    let result = provider
        .resolve_bool_value("test-flag.enabled", &context)
        .await
        .unwrap();
    assert!(result.value);
}

#[test(tokio::test)]
async fn test_flag_not_found() {
    let (_server, provider) = setup_mock_server(ResponseTemplate::new(404)).await;

    let err = provider
        .resolve_bool_value("test-flag", &EvaluationContext::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, EvaluationErrorCode::FlagNotFound);
}

#[test(tokio::test)]
async fn test_type_mismatch_is_general() {
    let (_server, provider) = setup_mock_server(resolved(json!({"enabled": true}))).await;

    let err = provider
        .resolve_int_value("test-flag.enabled", &EvaluationContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err.code, EvaluationErrorCode::General(_)));
}

#[test(tokio::test)]
async fn test_no_variant_is_error() {
    let (_server, provider) = setup_mock_server(ResponseTemplate::new(200).set_body_json(json!({
        "resolvedFlags": [{"flag": "flags/test-flag", "variant": "", "value": null}],
        "resolveToken": "token"
    })))
    .await;

    let err = provider
        .resolve_string_value("test-flag.title", &EvaluationContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err.code, EvaluationErrorCode::General(_)));
}

#[test(tokio::test)]
async fn test_null_value_is_error() {
    let (_server, provider) =
        setup_mock_server(resolved(json!({"enabled": null, "count": null}))).await;
    let context = EvaluationContext::default().with_targeting_key("test-user");

    let err = provider
        .resolve_bool_value("test-flag.enabled", &context)
        .await
        .unwrap_err();
    assert!(matches!(err.code, EvaluationErrorCode::General(_)));

    let err = provider
        .resolve_int_value("test-flag.count", &context)
        .await
        .unwrap_err();
    assert!(matches!(err.code, EvaluationErrorCode::General(_)));
}
