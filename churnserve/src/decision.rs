//! Decision policy: turns a churn probability into the label consumers act on.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ConfigError;

/// Probability cutoff for the churn label, fixed at deployment time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecisionThreshold(f64);

impl DecisionThreshold {
    pub const DEFAULT: f64 = 0.4;

    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::Invalid(format!(
                "decision threshold must be within [0, 1], got {value}"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for DecisionThreshold {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecisionThreshold> for f64 {
    fn from(threshold: DecisionThreshold) -> Self {
        threshold.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Retain,
    Churn,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Retain => 0,
            Label::Churn => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Retain => "retain",
            Label::Churn => "churn",
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// `Churn` iff `probability >= threshold`; the boundary is inclusive.
pub fn decide(probability: f64, threshold: DecisionThreshold) -> Label {
    if probability >= threshold.value() {
        Label::Churn
    } else {
        Label::Retain
    }
}

/// Rounds to three decimals for display. Never feed the result back into [`decide`].
///
/// Rounds the exact binary value, so `0.1235` (stored just below the tie)
/// displays as `0.123`.
pub fn round_probability(probability: f64) -> f64 {
    format!("{probability:.3}").parse().unwrap_or(probability)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub probability: f64,
    pub label: Label,
}

impl PredictionResult {
    pub fn new(probability: f64, threshold: DecisionThreshold) -> Self {
        Self {
            probability,
            label: decide(probability, threshold),
        }
    }
}
