// src/analysis/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[serde(rename = "Registered")]
    Registered,
    #[serde(rename = "No Registration Found")]
    NotFound,
    #[serde(rename = "Check Failed")]
    CheckFailed,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "Registered",
            RegistrationStatus::NotFound => "No Registration Found",
            RegistrationStatus::CheckFailed => "Check Failed",
            RegistrationStatus::Unknown => "Unknown",
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationStatus::Registered)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the company presence checks for one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyChecks {
    pub linkedin_presence: bool,
    #[serde(rename = "X_presence")]
    pub x_presence: bool,
    pub glassdoor_rating: Option<f64>,
    pub government_registration: RegistrationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckValue {
    Flag(bool),
    Status(RegistrationStatus),
    Rating(Option<f64>),
}

impl CheckValue {
    pub fn passed(&self) -> Option<bool> {
        match self {
            CheckValue::Flag(flag) => Some(*flag),
            CheckValue::Status(status) => Some(status.is_registered()),
            CheckValue::Rating(_) => None,
        }
    }
}

impl CompanyChecks {
    /// Check name/value pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, CheckValue)> {
        vec![
            ("linkedin_presence", CheckValue::Flag(self.linkedin_presence)),
            ("X_presence", CheckValue::Flag(self.x_presence)),
            ("glassdoor_rating", CheckValue::Rating(self.glassdoor_rating)),
            (
                "government_registration",
                CheckValue::Status(self.government_registration),
            ),
        ]
    }

    pub fn has_social_presence(&self) -> bool {
        self.linkedin_presence || self.x_presence
    }
}

/// One triggered heuristic, phrased for the reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskFactor(pub String);

impl RiskFactor {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
