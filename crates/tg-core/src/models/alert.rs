//! Alert data models.
//!
//! An [`Alert`] records one firing of a detection rule against a user's
//! behavior. Alerts are created by the external rule engine and afterwards
//! mutated only through the triage transitions in [`crate::triage`].
//!
//! Each alert owns at most one user response: the flagged user's answer to
//! a "was this you?" prompt. The response is modeled as a state machine
//! ([`UserResponse`]) rather than a nullable record, so "not asked yet",
//! "asked, no reply", and "replied" cannot be conflated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity assigned to an alert by the detection rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
        }
    }
}

/// Category of detection that produced the alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Authentication anomalies.
    Login,
    /// File access or exfiltration detections.
    File,
    /// Credential or privilege attacks.
    Security,
    /// Behavioral pattern deviations.
    Behavior,
    /// Access-control violations.
    Access,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Login => write!(f, "login"),
            AlertKind::File => write!(f, "file"),
            AlertKind::Security => write!(f, "security"),
            AlertKind::Behavior => write!(f, "behavior"),
            AlertKind::Access => write!(f, "access"),
        }
    }
}

/// Lifecycle state of an alert in the triage workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Newly created, awaiting an operator.
    Active,
    /// An operator has opened the alert for review.
    Investigating,
    /// Closed as benign or not actionable. Terminal.
    Dismissed,
    /// Closed after investigation completed. Terminal.
    Resolved,
}

impl AlertStatus {
    /// Whether this status ends the alert lifecycle.
    ///
    /// `resolved_at` is set if and only if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Dismissed | AlertStatus::Resolved)
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Dismissed => "dismissed",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel used to deliver a verification prompt to the flagged user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResponseChannel {
    Email,
    Sms,
    AppNotification,
    PhoneCall,
}

impl ResponseChannel {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseChannel::Email => "email",
            ResponseChannel::Sms => "sms",
            ResponseChannel::AppNotification => "app_notification",
            ResponseChannel::PhoneCall => "phone_call",
        }
    }

    /// Parses a channel from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(ResponseChannel::Email),
            "sms" => Some(ResponseChannel::Sms),
            "app_notification" => Some(ResponseChannel::AppNotification),
            "phone_call" => Some(ResponseChannel::PhoneCall),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResponseChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The flagged user's verdict on the detected activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVerdict {
    /// The user confirms the activity was theirs.
    Confirmed,
    /// The user denies the activity.
    Denied,
}

/// State of the "was this you?" exchange attached to an alert.
///
/// Once a verdict is recorded it is immutable history; the triage layer
/// rejects attempts to overwrite it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum UserResponse {
    /// No prompt has been sent for this alert.
    NotNotified,
    /// A prompt was delivered; the user has not yet replied. This is a
    /// valid waiting state, not an error.
    AwaitingResponse {
        /// Channel the prompt went out on.
        channel: ResponseChannel,
        /// When the prompt was sent.
        notified_at: DateTime<Utc>,
    },
    /// The user confirmed the activity as their own.
    Confirmed {
        /// Free-text explanation from the user.
        explanation: String,
        /// Channel the reply came back on.
        channel: ResponseChannel,
        /// When the reply was recorded.
        responded_at: DateTime<Utc>,
    },
    /// The user denied the activity.
    Denied {
        /// Free-text explanation from the user.
        explanation: String,
        /// Channel the reply came back on.
        channel: ResponseChannel,
        /// When the reply was recorded.
        responded_at: DateTime<Utc>,
    },
}

impl UserResponse {
    /// Whether a verdict (confirmed or denied) has been recorded.
    pub fn is_recorded(&self) -> bool {
        matches!(
            self,
            UserResponse::Confirmed { .. } | UserResponse::Denied { .. }
        )
    }

    /// The recorded verdict, if any.
    pub fn verdict(&self) -> Option<ResponseVerdict> {
        match self {
            UserResponse::Confirmed { .. } => Some(ResponseVerdict::Confirmed),
            UserResponse::Denied { .. } => Some(ResponseVerdict::Denied),
            _ => None,
        }
    }
}

/// One firing of a detection rule against a user's behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    /// Unique identifier for this alert.
    pub id: Uuid,
    /// Short summary of the detection.
    pub title: String,
    /// Longer description of what was observed.
    pub description: String,
    /// Severity assigned by the detection rule.
    pub severity: AlertSeverity,
    /// Category of detection.
    pub kind: AlertKind,
    /// The flagged user.
    pub user_id: Uuid,
    /// Denormalized user name for display without a directory lookup.
    pub user_name: String,
    /// When the detection fired.
    pub triggered_at: DateTime<Utc>,
    /// Name of the detection rule that fired.
    pub rule: String,
    /// Risk score the detection engine attached to this firing.
    pub risk_score: u32,
    /// Systems touched by the detected activity.
    pub affected_systems: Vec<String>,
    /// Current lifecycle state.
    pub status: AlertStatus,
    /// Set when the alert reaches a terminal state, and only then.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Free-text notes left by the operator.
    pub admin_notes: Option<String>,
    /// Ordered log of investigation steps taken.
    pub investigation_steps: Vec<String>,
    /// State of the "was this you?" exchange. Owned by the alert; discarded
    /// with it.
    pub user_response: UserResponse,
}

impl Alert {
    /// Creates a new active alert as the detection rule engine would.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: AlertSeverity,
        kind: AlertKind,
        user_id: Uuid,
        user_name: impl Into<String>,
        triggered_at: DateTime<Utc>,
        rule: impl Into<String>,
        risk_score: u32,
        affected_systems: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            severity,
            kind,
            user_id,
            user_name: user_name.into(),
            triggered_at,
            rule: rule.into(),
            risk_score,
            affected_systems,
            status: AlertStatus::Active,
            resolved_at: None,
            admin_notes: None,
            investigation_steps: Vec::new(),
            user_response: UserResponse::NotNotified,
        }
    }

    /// Appends a step to the investigation log.
    pub fn add_investigation_step(&mut self, step: impl Into<String>) {
        self.investigation_steps.push(step.into());
    }
}
