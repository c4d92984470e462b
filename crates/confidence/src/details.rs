use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfidenceError, ErrorCode};
use crate::value::FieldValue;

/// Metadata key holding the flag key exactly as the caller passed it.
pub const FLAG_KEY_METADATA: &str = "flag_key";

/// Why a resolution produced its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Cached,
    Default,
    Disabled,
    Error,
    Static,
    Split,
    TargetingMatch,
    Unknown,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Cached => "CACHED",
            Reason::Default => "DEFAULT",
            Reason::Disabled => "DISABLED",
            Reason::Error => "ERROR",
            Reason::Static => "STATIC",
            Reason::Split => "SPLIT",
            Reason::TargetingMatch => "TARGETING_MATCH",
            Reason::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a resolve call. Always carries a usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagResolutionDetails<T> {
    pub value: T,
    pub variant: Option<String>,
    pub reason: Reason,
    pub error_code: Option<ErrorCode>,
    pub error_message: Option<String>,
    pub flag_metadata: BTreeMap<String, String>,
}

impl<T> FlagResolutionDetails<T> {
    pub(crate) fn targeting_match(flag_key: &str, value: T, variant: String) -> Self {
        Self {
            value,
            variant: Some(variant),
            reason: Reason::TargetingMatch,
            error_code: None,
            error_message: None,
            flag_metadata: flag_key_metadata(flag_key),
        }
    }

    pub(crate) fn default_value(flag_key: &str, value: T) -> Self {
        Self {
            value,
            variant: None,
            reason: Reason::Default,
            error_code: None,
            error_message: None,
            flag_metadata: flag_key_metadata(flag_key),
        }
    }

    /// Folds a failure into a result holding `value`.
    ///
    /// Missing flags and timeouts keep reason DEFAULT with their own code.
    /// Every other failure is reported as ERROR with code GENERAL.
    pub(crate) fn from_error(flag_key: &str, value: T, error: &ConfidenceError) -> Self {
        let (reason, code) = match error.code() {
            ErrorCode::FlagNotFound => (Reason::Default, ErrorCode::FlagNotFound),
            ErrorCode::Timeout => (Reason::Default, ErrorCode::Timeout),
            _ => (Reason::Error, ErrorCode::General),
        };
        Self {
            value,
            variant: None,
            reason,
            error_code: Some(code),
            error_message: Some(error.to_string()),
            flag_metadata: flag_key_metadata(flag_key),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_code.is_some()
    }

    pub fn flag_key(&self) -> Option<&str> {
        self.flag_metadata.get(FLAG_KEY_METADATA).map(String::as_str)
    }
}

fn flag_key_metadata(flag_key: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(FLAG_KEY_METADATA.to_string(), flag_key.to_string())])
}

/// Raw resolver answer for a single flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolveResult {
    pub value: Option<FieldValue>,
    /// `None` when the resolver assigned no variant.
    pub variant: Option<String>,
    pub token: String,
}
