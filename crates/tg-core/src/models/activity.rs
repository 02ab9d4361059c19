//! Activity records ingested for a user.
//!
//! Activities arrive pre-classified: an upstream detector assigns each one
//! a [`ActivityRiskLevel`] at ingestion. The scorer consumes the
//! classification; it never re-derives it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of user activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Authentication to any system.
    Login,
    /// Read or download of files.
    FileAccess,
    /// Connection to an internal system (VPN, console, etc.).
    SystemAccess,
    /// Export of data out of a system of record.
    DataExport,
    /// Change to a permission or role assignment.
    PermissionChange,
}

impl ActivityKind {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::FileAccess => "file_access",
            ActivityKind::SystemAccess => "system_access",
            ActivityKind::DataExport => "data_export",
            ActivityKind::PermissionChange => "permission_change",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification assigned to an activity by the upstream detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityRiskLevel {
    /// Consistent with the user's normal behavior.
    Normal,
    /// Unusual enough to warrant weighting.
    Suspicious,
    /// Strong indicator of account misuse or compromise.
    Critical,
}

impl std::fmt::Display for ActivityRiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityRiskLevel::Normal => write!(f, "normal"),
            ActivityRiskLevel::Suspicious => write!(f, "suspicious"),
            ActivityRiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// A single observed activity belonging to one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for this activity.
    pub id: Uuid,
    /// Category of the activity.
    pub kind: ActivityKind,
    /// Human-readable description from the ingestion pipeline.
    pub description: String,
    /// When the activity occurred.
    pub timestamp: DateTime<Utc>,
    /// Network location the activity originated from.
    pub location: String,
    /// Device type the activity originated from.
    pub device_type: String,
    /// Source IP address as reported.
    pub ip_address: String,
    /// Classification assigned at ingestion.
    pub risk_level: ActivityRiskLevel,
}

impl Activity {
    /// Creates an activity with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ActivityKind,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        location: impl Into<String>,
        device_type: impl Into<String>,
        ip_address: impl Into<String>,
        risk_level: ActivityRiskLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            description: description.into(),
            timestamp,
            location: location.into(),
            device_type: device_type.into(),
            ip_address: ip_address.into(),
            risk_level,
        }
    }

    /// Whether the activity happened outside business hours
    /// (before 07:00 or after 19:59 local to the recorded timestamp).
    pub fn is_off_hours(&self) -> bool {
        use chrono::Timelike;
        let hour = self.timestamp.hour();
        hour < 7 || hour > 19
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn login_at(hour: u32) -> Activity {
        Activity::new(
            ActivityKind::Login,
            "Logged into system",
            Utc.with_ymd_and_hms(2025, 6, 10, hour, 30, 0).unwrap(),
            "Office Network",
            "Windows Desktop",
            "192.168.1.45",
            ActivityRiskLevel::Normal,
        )
    }

    #[test]
    fn test_off_hours_boundaries() {
        assert!(login_at(6).is_off_hours());
        assert!(!login_at(7).is_off_hours());
        assert!(!login_at(19).is_off_hours());
        assert!(login_at(20).is_off_hours());
        assert!(login_at(0).is_off_hours());
        assert!(login_at(23).is_off_hours());
    }

    #[test]
    fn test_activity_kind_serialization() {
        let json = serde_json::to_string(&ActivityKind::PermissionChange).unwrap();
        assert_eq!(json, "\"permission_change\"");
    }
}
