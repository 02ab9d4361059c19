//! Aggregate views for the operations dashboard.
//!
//! These are derived summaries, computed on demand from the directory's
//! current state; nothing here is stored.

use crate::models::alert::{Alert, UserResponse};
use crate::models::user::ScoredUser;
use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Organization-wide risk posture summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostureSummary {
    /// Number of monitored users.
    pub total_users: u64,
    /// Users grouped by risk level.
    #[serde(default)]
    pub by_risk_level: HashMap<String, u64>,
    /// Mean risk score across all users.
    pub mean_risk_score: f64,
    /// The user with the highest score, if any users exist.
    pub highest_risk_user: Option<Uuid>,
}

impl PostureSummary {
    /// Computes the summary over the current user set.
    pub fn compute(users: &[ScoredUser]) -> Self {
        let mut by_risk_level: HashMap<String, u64> = HashMap::new();
        let mut score_total: u64 = 0;
        let mut highest: Option<(Uuid, u32)> = None;

        for user in users {
            let assessment = user.assessment();
            *by_risk_level
                .entry(assessment.level.as_str().to_string())
                .or_insert(0) += 1;
            score_total += u64::from(assessment.score);
            if highest.map_or(true, |(_, best)| assessment.score > best) {
                highest = Some((user.profile.id, assessment.score));
            }
        }

        let mean_risk_score = if users.is_empty() {
            0.0
        } else {
            score_total as f64 / users.len() as f64
        };

        Self {
            total_users: users.len() as u64,
            by_risk_level,
            mean_risk_score,
            highest_risk_user: highest.map(|(id, _)| id),
        }
    }

    /// Count of users at the given risk level.
    pub fn count_at(&self, level: RiskLevel) -> u64 {
        self.by_risk_level.get(level.as_str()).copied().unwrap_or(0)
    }
}

/// Aggregate alert metrics for the alert center.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertMetrics {
    /// Total number of alerts.
    pub total_alerts: u64,
    /// Alerts still requiring operator attention.
    pub active: u64,
    /// Alerts whose lifecycle has ended.
    pub resolved: u64,
    /// Alerts grouped by severity.
    #[serde(default)]
    pub by_severity: HashMap<String, u64>,
    /// Alerts grouped by lifecycle status.
    #[serde(default)]
    pub by_status: HashMap<String, u64>,
    /// Alerts where the flagged user denied the activity — potential
    /// account compromise.
    pub denied_responses: u64,
    /// Alerts where a prompt went out and no reply has arrived.
    pub awaiting_responses: u64,
}

impl AlertMetrics {
    /// Computes the metrics over the current alert set.
    pub fn compute(alerts: &[Alert]) -> Self {
        let mut metrics = Self {
            total_alerts: alerts.len() as u64,
            ..Self::default()
        };

        for alert in alerts {
            if alert.status.is_terminal() {
                metrics.resolved += 1;
            } else {
                metrics.active += 1;
            }
            *metrics
                .by_severity
                .entry(alert.severity.to_string())
                .or_insert(0) += 1;
            *metrics
                .by_status
                .entry(alert.status.as_str().to_string())
                .or_insert(0) += 1;
            match alert.user_response {
                UserResponse::Denied { .. } => metrics.denied_responses += 1,
                UserResponse::AwaitingResponse { .. } => metrics.awaiting_responses += 1,
                _ => {}
            }
        }

        metrics
    }
}
