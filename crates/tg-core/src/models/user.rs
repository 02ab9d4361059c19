//! User identity and organizational attributes.
//!
//! A [`UserProfile`] carries the raw attributes the risk scorer consumes;
//! a [`ScoredUser`] pairs a profile with its activity history and the
//! assessment derived from them. The assessment is only ever written by the
//! scoring path, so the stored risk level cannot drift from the stored score.

use crate::models::activity::Activity;
use crate::risk::RiskAssessment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// System access tier granted to a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Standard user access.
    Basic,
    /// Elevated access to sensitive systems.
    Elevated,
    /// Administrative access.
    Admin,
}

impl AccessLevel {
    /// Risk points contributed by this access tier.
    pub fn risk_weight(&self) -> u32 {
        match self {
            AccessLevel::Basic => 0,
            AccessLevel::Elevated => 15,
            AccessLevel::Admin => 25,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Basic => "basic",
            AccessLevel::Elevated => "elevated",
            AccessLevel::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Organizational department, weighted by data sensitivity.
///
/// The set of recognized departments is closed; anything else parses to
/// [`Department::Other`], which carries no risk weight. A typo in an HR feed
/// therefore under-scores rather than mis-scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Finance,
    Executive,
    Legal,
    HumanResources,
    InformationTechnology,
    Engineering,
    Operations,
    Sales,
    Marketing,
    /// Unrecognized department name, preserved verbatim.
    Other(String),
}

impl Department {
    /// Risk points contributed by department data sensitivity.
    pub fn risk_weight(&self) -> u32 {
        match self {
            Department::Finance => 20,
            Department::Executive => 25,
            Department::Legal => 18,
            Department::HumanResources => 15,
            Department::InformationTechnology => 12,
            Department::Engineering => 10,
            Department::Operations => 10,
            Department::Sales => 8,
            Department::Marketing => 5,
            Department::Other(_) => 0,
        }
    }

    /// Parses a department from its display name. Never fails; unrecognized
    /// names map to [`Department::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Finance" => Department::Finance,
            "Executive" => Department::Executive,
            "Legal" => Department::Legal,
            "HR" => Department::HumanResources,
            "IT" => Department::InformationTechnology,
            "Engineering" => Department::Engineering,
            "Operations" => Department::Operations,
            "Sales" => Department::Sales,
            "Marketing" => Department::Marketing,
            other => Department::Other(other.to_string()),
        }
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        match self {
            Department::Finance => "Finance",
            Department::Executive => "Executive",
            Department::Legal => "Legal",
            Department::HumanResources => "HR",
            Department::InformationTechnology => "IT",
            Department::Engineering => "Engineering",
            Department::Operations => "Operations",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
            Department::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identity and organizational attributes of a monitored user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Unique identifier for this user.
    pub id: Uuid,
    /// Full display name.
    pub name: String,
    /// Corporate email address.
    pub email: String,
    /// Department the user belongs to.
    pub department: Department,
    /// Job title.
    pub role: String,
    /// Access tier granted to the user.
    pub access_level: AccessLevel,
    /// Date the user joined the organization. `None` when the HR feed did
    /// not supply one; the scorer treats this as zero tenure weight.
    pub join_date: Option<NaiveDate>,
}

impl UserProfile {
    /// Creates a profile with a fresh id.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: Department,
        role: impl Into<String>,
        access_level: AccessLevel,
        join_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            department,
            role: role.into(),
            access_level,
            join_date,
        }
    }
}

/// Raw input to directory initialization: a profile plus its ingested
/// activity history, before any scoring has happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// The user's identity and organizational attributes.
    pub profile: UserProfile,
    /// Activity history, ordered by ingestion.
    pub activities: Vec<Activity>,
}

/// A user together with the assessment derived from their current history.
///
/// The `assessment` field is private to keep the derived score in lockstep
/// with the inputs: it is written only when the directory (re)scores the
/// user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredUser {
    /// The user's identity and organizational attributes.
    pub profile: UserProfile,
    /// Activity history, ordered by ingestion.
    pub activities: Vec<Activity>,
    assessment: RiskAssessment,
}

impl ScoredUser {
    /// Pairs a record with its computed assessment.
    pub(crate) fn new(record: UserRecord, assessment: RiskAssessment) -> Self {
        Self {
            profile: record.profile,
            activities: record.activities,
            assessment,
        }
    }

    /// The current risk assessment.
    pub fn assessment(&self) -> &RiskAssessment {
        &self.assessment
    }

    /// Replaces the assessment after a recompute.
    pub(crate) fn set_assessment(&mut self, assessment: RiskAssessment) {
        self.assessment = assessment;
    }
}
