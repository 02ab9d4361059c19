//! Risk scoring for monitored users.
//!
//! The scorer maps a user profile plus activity history to an integer risk
//! score and a coarse risk level. Scoring is a pure function of its inputs:
//! no hidden state, no clock reads, no error paths. Degenerate inputs
//! degrade to zero weight (unknown department, missing join date) instead
//! of failing the computation.
//!
//! The score is a weighted sum of contextual signals (access tier,
//! department sensitivity, tenure) and behavioral signals (pre-classified
//! activity, off-hours access, device and location diversity). Weights are
//! integer points; the sum is not clamped.

use crate::models::activity::{Activity, ActivityRiskLevel};
use crate::models::user::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Coarse risk classification derived from a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configurable weights for the behavioral signals and the classification
/// bands. The contextual tables (access level, department, tenure) are
/// closed mappings on their enums and are not configurable here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RiskWeights {
    /// Points per activity classified suspicious (default: 10).
    pub suspicious_activity: u32,
    /// Points per activity classified critical (default: 25).
    pub critical_activity: u32,
    /// Points per activity outside business hours (default: 5).
    pub off_hours_activity: u32,
    /// Bonus when distinct device types exceed the threshold (default: 15).
    pub device_diversity_bonus: u32,
    /// Distinct device types required before the bonus applies (default: 3).
    pub device_diversity_threshold: usize,
    /// Bonus when distinct locations exceed the threshold (default: 10).
    pub location_diversity_bonus: u32,
    /// Distinct locations required before the bonus applies (default: 2).
    pub location_diversity_threshold: usize,
    /// Scores at or above this classify high (default: 60).
    pub high_threshold: u32,
    /// Scores at or above this (and below high) classify medium (default: 30).
    pub medium_threshold: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            suspicious_activity: 10,
            critical_activity: 25,
            off_hours_activity: 5,
            device_diversity_bonus: 15,
            device_diversity_threshold: 3,
            location_diversity_bonus: 10,
            location_diversity_threshold: 2,
            high_threshold: 60,
            medium_threshold: 30,
        }
    }
}

impl RiskWeights {
    /// Validates that the classification bands are not inverted.
    pub fn validate(&self) -> Result<(), String> {
        if self.medium_threshold >= self.high_threshold {
            return Err(format!(
                "medium threshold ({}) must be below high threshold ({})",
                self.medium_threshold, self.high_threshold
            ));
        }
        Ok(())
    }

    /// Classifies a score against the bands, highest band first so boundary
    /// values land in the higher band.
    pub fn classify(&self, score: u32) -> RiskLevel {
        if score >= self.high_threshold {
            RiskLevel::High
        } else if score >= self.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// One contribution to a risk score, kept for operator display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskFactor {
    /// Human-readable name of the signal.
    pub name: String,
    /// Points this signal contributed.
    pub points: u32,
}

impl RiskFactor {
    fn new(name: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// A computed risk score with its classification and breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Sum of all contributing signals, unclamped.
    pub score: u32,
    /// Classification of the score.
    pub level: RiskLevel,
    /// Non-zero contributions, in evaluation order.
    pub factors: Vec<RiskFactor>,
    /// The evaluation instant the assessment was computed against.
    pub assessed_at: DateTime<Utc>,
}

/// Tenure points from join date to the evaluation instant.
///
/// Months are whole 30-day periods. Bucket lower bounds are exclusive: a
/// user at exactly 3 months falls into the under-6 bucket. A missing join
/// date contributes nothing.
fn tenure_weight(profile: &UserProfile, as_of: DateTime<Utc>) -> u32 {
    let Some(join_date) = profile.join_date else {
        return 0;
    };
    let days = (as_of.date_naive() - join_date).num_days().max(0);
    let months = days / 30;
    match months {
        0..=2 => 20,
        3..=5 => 15,
        6..=11 => 10,
        12..=23 => 5,
        _ => 0,
    }
}

/// Computes the risk assessment for a user given their activity history.
///
/// Pure and deterministic: the same profile, activities, weights, and
/// evaluation instant always yield the same assessment.
pub fn assess(
    profile: &UserProfile,
    activities: &[Activity],
    weights: &RiskWeights,
    as_of: DateTime<Utc>,
) -> RiskAssessment {
    let mut score: u32 = 0;
    let mut factors = Vec::new();

    let access = profile.access_level.risk_weight();
    if access > 0 {
        score += access;
        factors.push(RiskFactor::new(
            format!("{} access level", profile.access_level),
            access,
        ));
    }

    let department = profile.department.risk_weight();
    if department > 0 {
        score += department;
        factors.push(RiskFactor::new(
            format!("{} department data sensitivity", profile.department),
            department,
        ));
    }

    let tenure = tenure_weight(profile, as_of);
    if tenure > 0 {
        score += tenure;
        factors.push(RiskFactor::new("Short tenure", tenure));
    }

    let suspicious = activities
        .iter()
        .filter(|a| a.risk_level == ActivityRiskLevel::Suspicious)
        .count() as u32;
    if suspicious > 0 {
        let points = suspicious * weights.suspicious_activity;
        score += points;
        factors.push(RiskFactor::new(
            format!("{} suspicious activities", suspicious),
            points,
        ));
    }

    let critical = activities
        .iter()
        .filter(|a| a.risk_level == ActivityRiskLevel::Critical)
        .count() as u32;
    if critical > 0 {
        let points = critical * weights.critical_activity;
        score += points;
        factors.push(RiskFactor::new(
            format!("{} critical activities", critical),
            points,
        ));
    }

    let off_hours = activities.iter().filter(|a| a.is_off_hours()).count() as u32;
    if off_hours > 0 {
        let points = off_hours * weights.off_hours_activity;
        score += points;
        factors.push(RiskFactor::new(
            format!("{} off-hours activities", off_hours),
            points,
        ));
    }

    let devices: HashSet<&str> = activities.iter().map(|a| a.device_type.as_str()).collect();
    if devices.len() > weights.device_diversity_threshold {
        score += weights.device_diversity_bonus;
        factors.push(RiskFactor::new(
            format!("Access from {} distinct device types", devices.len()),
            weights.device_diversity_bonus,
        ));
    }

    let locations: HashSet<&str> = activities.iter().map(|a| a.location.as_str()).collect();
    if locations.len() > weights.location_diversity_threshold {
        score += weights.location_diversity_bonus;
        factors.push(RiskFactor::new(
            format!("Access from {} distinct locations", locations.len()),
            weights.location_diversity_bonus,
        ));
    }

    RiskAssessment {
        score,
        level: weights.classify(score),
        factors,
        assessed_at: as_of,
    }
}
