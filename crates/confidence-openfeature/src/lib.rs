//! Confidence Provider for OpenFeature
//!
//! Resolves OpenFeature flags through a [`confidence_sdk::Confidence`] client.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use confidence_sdk::{Confidence, ConfidenceOptions};
//! use open_feature::EvaluationContext;
//! use open_feature::provider::FeatureProvider;
//! use open_feature_confidence::ConfidenceProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let confidence = Confidence::new("client-secret", ConfidenceOptions::default()).unwrap();
//!     let provider = ConfidenceProvider::new(confidence);
//!
//!     let context = EvaluationContext::default().with_targeting_key("user-123");
//!     let result = provider.resolve_bool_value("my-flag.enabled", &context).await;
//!     println!("enabled: {:?}", result.map(|details| details.value));
//! }
//! ```
//!
//! Flag keys may carry a dot path into the flag value, as in
//! `my-flag.enabled`.

mod context;

use async_trait::async_trait;
use confidence_sdk::{Confidence, ErrorCode, FlagResolutionDetails, Object, Reason};
use open_feature::provider::{FeatureProvider, ProviderMetadata, ResolutionDetails};
use open_feature::{
    EvaluationContext, EvaluationError, EvaluationErrorCode, EvaluationReason, EvaluationResult,
    FlagMetadata, FlagMetadataValue, StructValue,
};
use tracing::{debug, instrument};

use context::{object_to_struct, to_confidence_context};

const METADATA: &str = "Confidence";

/// OpenFeature provider backed by the Confidence resolver.
#[derive(Debug)]
pub struct ConfidenceProvider {
    metadata: ProviderMetadata,
    confidence: Confidence,
}

impl ConfidenceProvider {
    pub fn new(confidence: Confidence) -> Self {
        Self {
            metadata: ProviderMetadata::new(METADATA),
            confidence,
        }
    }

    fn client(&self, context: &EvaluationContext) -> Confidence {
        self.confidence.with_context(to_confidence_context(context))
    }
}

#[async_trait]
impl FeatureProvider for ConfidenceProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    #[instrument(skip(self, context), fields(flag_key = %flag_key))]
    async fn resolve_bool_value(
        &self,
        flag_key: &str,
        context: &EvaluationContext,
    ) -> EvaluationResult<ResolutionDetails<bool>> {
        debug!("Resolving boolean flag");
        let details = self
            .client(context)
            .resolve_details_async::<Option<bool>>(flag_key, None)
            .await;
        to_resolution_details(details, |v| v)
    }

    #[instrument(skip(self, context), fields(flag_key = %flag_key))]
    async fn resolve_int_value(
        &self,
        flag_key: &str,
        context: &EvaluationContext,
    ) -> EvaluationResult<ResolutionDetails<i64>> {
        debug!("Resolving integer flag");
        let details = self
            .client(context)
            .resolve_details_async::<Option<i64>>(flag_key, None)
            .await;
        to_resolution_details(details, |v| v)
    }

    #[instrument(skip(self, context), fields(flag_key = %flag_key))]
    async fn resolve_float_value(
        &self,
        flag_key: &str,
        context: &EvaluationContext,
    ) -> EvaluationResult<ResolutionDetails<f64>> {
        debug!("Resolving float flag");
        let details = self
            .client(context)
            .resolve_details_async::<Option<f64>>(flag_key, None)
            .await;
        to_resolution_details(details, |v| v)
    }

    #[instrument(skip(self, context), fields(flag_key = %flag_key))]
    async fn resolve_string_value(
        &self,
        flag_key: &str,
        context: &EvaluationContext,
    ) -> EvaluationResult<ResolutionDetails<String>> {
        debug!("Resolving string flag");
        let details = self
            .client(context)
            .resolve_details_async::<Option<String>>(flag_key, None)
            .await;
        to_resolution_details(details, |v| v)
    }

    #[instrument(skip(self, context), fields(flag_key = %flag_key))]
    async fn resolve_struct_value(
        &self,
        flag_key: &str,
        context: &EvaluationContext,
    ) -> EvaluationResult<ResolutionDetails<StructValue>> {
        debug!("Resolving struct flag");
        let details = self
            .client(context)
            .resolve_details_async::<Option<Object>>(flag_key, None)
            .await;
        to_resolution_details(details, |v| object_to_struct(&v))
    }
}

/// Turns SDK details into an OpenFeature result.
///
/// Resolves are made with a `None` default, so a `None` value means the SDK
/// had nothing to return. Errors, results without an assigned variant and
/// null values all become `Err` so the OpenFeature client falls back to the
/// application's default.
fn to_resolution_details<T, U>(
    details: FlagResolutionDetails<Option<T>>,
    convert: impl FnOnce(T) -> U,
) -> EvaluationResult<ResolutionDetails<U>> {
    if let Some(code) = details.error_code {
        return Err(EvaluationError {
            code: error_code(code),
            message: details.error_message,
        });
    }
    if details.reason == Reason::Default {
        return Err(EvaluationError {
            code: EvaluationErrorCode::General("No variant assigned".to_string()),
            message: Some("Flag resolved without a variant, use the default value".to_string()),
        });
    }
    let Some(value) = details.value else {
        return Err(EvaluationError {
            code: EvaluationErrorCode::General("Flag value is null".to_string()),
            message: Some(format!(
                "Flag {} resolved to a null value, use the default value",
                details.flag_key().unwrap_or_default()
            )),
        });
    };

    let flag_metadata = details
        .flag_metadata
        .iter()
        .fold(FlagMetadata::default(), |metadata, (key, entry)| {
            metadata.with_value(key.clone(), FlagMetadataValue::String(entry.clone()))
        });

    Ok(ResolutionDetails {
        value: convert(value),
        variant: details.variant,
        reason: Some(reason(details.reason)),
        flag_metadata: Some(flag_metadata),
    })
}

fn error_code(code: ErrorCode) -> EvaluationErrorCode {
    match code {
        ErrorCode::FlagNotFound => EvaluationErrorCode::FlagNotFound,
        ErrorCode::TypeMismatch => EvaluationErrorCode::TypeMismatch,
        ErrorCode::ParseError => EvaluationErrorCode::ParseError,
        ErrorCode::TargetingKeyMissing => EvaluationErrorCode::TargetingKeyMissing,
        ErrorCode::InvalidContext => EvaluationErrorCode::InvalidContext,
        ErrorCode::NotReady => EvaluationErrorCode::ProviderNotReady,
        ErrorCode::Timeout => EvaluationErrorCode::General("Timeout".to_string()),
        ErrorCode::General => EvaluationErrorCode::General("General error".to_string()),
    }
}

fn reason(reason: Reason) -> EvaluationReason {
    match reason {
        Reason::Cached => EvaluationReason::Cached,
        Reason::Default => EvaluationReason::Default,
        Reason::Disabled => EvaluationReason::Disabled,
        Reason::Error => EvaluationReason::Error,
        Reason::Static => EvaluationReason::Static,
        Reason::Split => EvaluationReason::Split,
        Reason::TargetingMatch => EvaluationReason::TargetingMatch,
        Reason::Unknown => EvaluationReason::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn details<T>(
        value: Option<T>,
        reason: Reason,
        error_code: Option<ErrorCode>,
    ) -> FlagResolutionDetails<Option<T>> {
        FlagResolutionDetails {
            value,
            variant: Some("on").filter(|_| reason == Reason::TargetingMatch).map(String::from),
            reason,
            error_code,
            error_message: error_code.map(|c| c.to_string()),
            flag_metadata: BTreeMap::from([("flag_key".to_string(), "flag1".to_string())]),
        }
    }

    #[test]
    fn test_targeting_match() {
        let result = to_resolution_details(
            details(Some(true), Reason::TargetingMatch, None),
            |v| v,
        )
        .unwrap();
        assert!(result.value);
        assert_eq!(result.variant.as_deref(), Some("on"));
        assert_eq!(result.reason, Some(EvaluationReason::TargetingMatch));
        assert!(result.flag_metadata.is_some());
    }

    #[test]
    fn test_error_codes() {
        let err = to_resolution_details(
            details(None::<bool>, Reason::Default, Some(ErrorCode::FlagNotFound)),
            |v| v,
        )
        .unwrap_err();
        assert_eq!(err.code, EvaluationErrorCode::FlagNotFound);

        let err = to_resolution_details(
            details(None::<bool>, Reason::Default, Some(ErrorCode::Timeout)),
            |v| v,
        )
        .unwrap_err();
        assert_eq!(err.code, EvaluationErrorCode::General("Timeout".to_string()));

        assert_eq!(
            error_code(ErrorCode::NotReady),
            EvaluationErrorCode::ProviderNotReady
        );
    }

    #[test]
    fn test_default_without_error_is_error() {
        let err = to_resolution_details(details(None::<i64>, Reason::Default, None), |v| v)
            .unwrap_err();
        assert!(matches!(err.code, EvaluationErrorCode::General(_)));
    }

    #[test]
    fn test_null_value_is_error() {
        let err = to_resolution_details(
            details(None::<bool>, Reason::TargetingMatch, None),
            |v| v,
        )
        .unwrap_err();
        assert!(matches!(err.code, EvaluationErrorCode::General(_)));
        assert!(err.message.unwrap().contains("flag1"));
    }
}
