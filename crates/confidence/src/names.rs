//! Resource names used by the resolver API (`flags/{flag}` and
//! `flags/{flag}/variants/{variant}`).

use std::fmt;
use std::str::FromStr;

use crate::error::ConfidenceError;

/// Name of a flag, `flags/{flag}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagName {
    pub flag: String,
}

impl FlagName {
    pub fn new(flag: impl Into<String>) -> Self {
        Self { flag: flag.into() }
    }

    pub fn parse(resource_name: &str) -> Result<Self, ConfidenceError> {
        let mut segments = resource_name.splitn(3, '/');
        match (segments.next(), segments.next()) {
            (Some("flags"), Some(flag)) => Ok(Self::new(flag)),
            _ => Err(ConfidenceError::Name(format!(
                "'{}' is not a flag name",
                resource_name
            ))),
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flags/{}", self.flag)
    }
}

impl FromStr for FlagName {
    type Err = ConfidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Name of a flag variant, `flags/{flag}/variants/{variant}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantName {
    pub flag: String,
    pub variant: String,
}

impl VariantName {
    pub fn parse(resource_name: &str) -> Result<Self, ConfidenceError> {
        let segments: Vec<&str> = resource_name.split('/').collect();
        match segments.as_slice() {
            ["flags", flag, "variants", variant] => Ok(Self {
                flag: flag.to_string(),
                variant: variant.to_string(),
            }),
            _ => Err(ConfidenceError::Name(format!(
                "'{}' is not a variant name",
                resource_name
            ))),
        }
    }
}

impl fmt::Display for VariantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flags/{}/variants/{}", self.flag, self.variant)
    }
}

impl FromStr for VariantName {
    type Err = ConfidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
