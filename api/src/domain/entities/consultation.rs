//! Consultation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Doctor's suggestion after reviewing a lab result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoctorSuggestion {
    NoIssues,
    HomeQuarantine,
    Admit,
}

impl std::fmt::Display for DoctorSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoctorSuggestion::NoIssues => write!(f, "NO_ISSUES"),
            DoctorSuggestion::HomeQuarantine => write!(f, "HOME_QUARANTINE"),
            DoctorSuggestion::Admit => write!(f, "ADMIT"),
        }
    }
}

impl std::str::FromStr for DoctorSuggestion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NO_ISSUES" => Ok(DoctorSuggestion::NoIssues),
            "HOME_QUARANTINE" => Ok(DoctorSuggestion::HomeQuarantine),
            "ADMIT" => Ok(DoctorSuggestion::Admit),
            _ => Err(format!("Unknown doctor suggestion: {}", s)),
        }
    }
}

/// A consultation owned by a test request
#[derive(Debug, Clone, Serialize)]
pub struct Consultation {
    pub suggestion: DoctorSuggestion,
    pub comments: Option<String>,
    pub doctor_id: UserId,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to record a consultation
#[derive(Debug, Clone)]
pub struct NewConsultation {
    pub suggestion: DoctorSuggestion,
    pub comments: Option<String>,
    pub doctor_id: UserId,
}

impl NewConsultation {
    pub fn into_consultation(self, updated_at: DateTime<Utc>) -> Consultation {
        Consultation {
            suggestion: self.suggestion,
            comments: self.comments,
            doctor_id: self.doctor_id,
            updated_at,
        }
    }
}
