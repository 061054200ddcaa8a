//! Lab result domain entity
//!
//! Vitals and outcome recorded by a tester when a lab test completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Outcome of a COVID test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Positive,
    Negative,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Positive => write!(f, "POSITIVE"),
            TestStatus::Negative => write!(f, "NEGATIVE"),
        }
    }
}

impl std::str::FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POSITIVE" => Ok(TestStatus::Positive),
            "NEGATIVE" => Ok(TestStatus::Negative),
            _ => Err(format!("Unknown test status: {}", s)),
        }
    }
}

/// A lab result owned by a test request
#[derive(Debug, Clone, Serialize)]
pub struct LabResult {
    pub blood_pressure: String,
    pub heart_beat: String,
    pub temperature: String,
    pub oxygen_level: String,
    pub comments: String,
    pub result: TestStatus,
    pub tester_id: UserId,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to record a lab result
#[derive(Debug, Clone)]
pub struct NewLabResult {
    pub blood_pressure: String,
    pub heart_beat: String,
    pub temperature: String,
    pub oxygen_level: String,
    pub comments: String,
    pub result: TestStatus,
    pub tester_id: UserId,
}

impl NewLabResult {
    pub fn into_lab_result(self, updated_at: DateTime<Utc>) -> LabResult {
        LabResult {
            blood_pressure: self.blood_pressure,
            heart_beat: self.heart_beat,
            temperature: self.temperature,
            oxygen_level: self.oxygen_level,
            comments: self.comments,
            result: self.result,
            tester_id: self.tester_id,
            updated_at,
        }
    }
}
