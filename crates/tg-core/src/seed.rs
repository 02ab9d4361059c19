//! Demo data set for the CLI and examples.
//!
//! Builds a small but realistic directory through the same public
//! operations the production feeds would use: users are scored by the
//! explicit initialization step, alerts are ingested and then driven
//! through real triage transitions. No score or status is hard-coded.

use crate::directory::SecurityDirectory;
use crate::models::activity::{Activity, ActivityKind, ActivityRiskLevel};
use crate::models::alert::{Alert, AlertKind, AlertSeverity, ResponseChannel, ResponseVerdict};
use crate::models::user::{AccessLevel, Department, UserProfile, UserRecord};
use crate::notification::MockDispatcher;
use crate::risk::RiskWeights;
use crate::triage::{TransitionOptions, TriageError};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// A timestamp `days_ago` days before `now`, pinned to a wall-clock hour
/// so off-hours detection behaves the same on every run.
fn at(now: DateTime<Utc>, days_ago: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    (now - Duration::days(days_ago))
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .expect("literal wall-clock time")
        .and_utc()
}

fn office_login(now: DateTime<Utc>, days_ago: i64, hour: u32) -> Activity {
    Activity::new(
        ActivityKind::Login,
        "Logged into system",
        at(now, days_ago, hour, 10),
        "Office Network",
        "Windows Desktop",
        "192.168.1.45",
        ActivityRiskLevel::Normal,
    )
}

fn user_records(now: DateTime<Utc>) -> Vec<UserRecord> {
    let join_months_ago =
        |months: i64| Some((now - Duration::days(months * 30)).date_naive());
    let join_on = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d);

    vec![
        UserRecord {
            profile: UserProfile::new(
                "Sarah Johnson",
                "sarah.johnson@company.com",
                Department::Finance,
                "Senior Financial Analyst",
                AccessLevel::Elevated,
                join_months_ago(2),
            ),
            activities: vec![
                office_login(now, 3, 9),
                Activity::new(
                    ActivityKind::Login,
                    "Login from new device",
                    at(now, 2, 2, 15),
                    "Unknown Location",
                    "iPhone 15",
                    "203.45.67.89",
                    ActivityRiskLevel::Critical,
                ),
                Activity::new(
                    ActivityKind::DataExport,
                    "Downloaded customer database",
                    at(now, 1, 23, 30),
                    "Coffee Shop WiFi",
                    "Personal Laptop",
                    "45.123.78.90",
                    ActivityRiskLevel::Critical,
                ),
                Activity::new(
                    ActivityKind::FileAccess,
                    "Accessed HR salary files",
                    at(now, 1, 14, 5),
                    "Office Network",
                    "Windows Desktop",
                    "192.168.1.45",
                    ActivityRiskLevel::Suspicious,
                ),
            ],
        },
        UserRecord {
            profile: UserProfile::new(
                "Michael Chen",
                "michael.chen@company.com",
                Department::Engineering,
                "Senior Software Engineer",
                AccessLevel::Elevated,
                join_on(2021, 3, 10),
            ),
            activities: vec![
                office_login(now, 4, 9),
                office_login(now, 2, 10),
                Activity::new(
                    ActivityKind::SystemAccess,
                    "Connected to VPN",
                    at(now, 1, 11, 40),
                    "Home Network",
                    "MacBook Pro",
                    "73.158.64.22",
                    ActivityRiskLevel::Normal,
                ),
            ],
        },
        UserRecord {
            profile: UserProfile::new(
                "Emily Rodriguez",
                "emily.rodriguez@company.com",
                Department::HumanResources,
                "HR Manager",
                AccessLevel::Elevated,
                join_months_ago(22),
            ),
            activities: vec![
                office_login(now, 5, 9),
                Activity::new(
                    ActivityKind::FileAccess,
                    "Bulk download of employee records",
                    at(now, 2, 22, 20),
                    "Office Network",
                    "Windows Desktop",
                    "192.168.1.45",
                    ActivityRiskLevel::Suspicious,
                ),
            ],
        },
        UserRecord {
            profile: UserProfile::new(
                "David Kim",
                "david.kim@company.com",
                Department::Marketing,
                "Marketing Director",
                AccessLevel::Basic,
                join_on(2020, 1, 15),
            ),
            activities: vec![office_login(now, 3, 10), office_login(now, 1, 15)],
        },
        UserRecord {
            profile: UserProfile::new(
                "James Wilson",
                "james.wilson@company.com",
                Department::Executive,
                "Chief Technology Officer",
                AccessLevel::Admin,
                join_months_ago(1),
            ),
            activities: vec![
                office_login(now, 2, 8),
                Activity::new(
                    ActivityKind::Login,
                    "Simultaneous sessions from different countries",
                    at(now, 1, 13, 30),
                    "Unknown Location",
                    "Hotel Business Center",
                    "91.223.45.10",
                    ActivityRiskLevel::Critical,
                ),
            ],
        },
        UserRecord {
            profile: UserProfile::new(
                "Robert Martinez",
                "robert.martinez@company.com",
                Department::Sales,
                "Sales Representative",
                AccessLevel::Basic,
                join_months_ago(5),
            ),
            activities: vec![
                office_login(now, 2, 9),
                Activity::new(
                    ActivityKind::PermissionChange,
                    "Attempted access to admin-level functions",
                    at(now, 1, 15, 15),
                    "Office Network",
                    "Windows Desktop",
                    "192.168.1.61",
                    ActivityRiskLevel::Suspicious,
                ),
            ],
        },
    ]
}

/// Builds the demo directory with default weights.
pub fn demo_directory() -> Result<SecurityDirectory, TriageError> {
    demo_directory_with_weights(RiskWeights::default())
}

/// Builds the demo directory, scoring users with the given weights.
pub fn demo_directory_with_weights(
    weights: RiskWeights,
) -> Result<SecurityDirectory, TriageError> {
    let now = Utc::now();
    let mut dir = SecurityDirectory::from_records(user_records(now), weights, now);
    let dispatcher = MockDispatcher::new();

    let id_of = |dir: &SecurityDirectory, email: &str| {
        dir.users()
            .iter()
            .find(|u| u.profile.email == email)
            .map(|u| u.profile.id)
            .expect("seed user exists")
    };
    let sarah = id_of(&dir, "sarah.johnson@company.com");
    let michael = id_of(&dir, "michael.chen@company.com");
    let emily = id_of(&dir, "emily.rodriguez@company.com");
    let david = id_of(&dir, "david.kim@company.com");
    let james = id_of(&dir, "james.wilson@company.com");
    let robert = id_of(&dir, "robert.martinez@company.com");

    // Under investigation; the user denies the activity.
    let export_alert = dir.ingest_alert(Alert::new(
        "Suspicious Data Export",
        "Large volume of customer data exported to external drive during off-hours",
        AlertSeverity::High,
        AlertKind::File,
        sarah,
        "Sarah Johnson",
        at(now, 1, 23, 30),
        "Bulk Data Export Detection",
        85,
        vec!["Customer Database".to_string(), "CRM System".to_string()],
    ))?;
    dir.notify_user(export_alert, ResponseChannel::Email, &dispatcher)?;
    dir.record_response(
        export_alert,
        ResponseVerdict::Denied,
        "I was not in the office at that time and did not access any systems. \
         This appears to be unauthorized access to my account.",
    )?;
    dir.open_alert(export_alert)?;
    dir.annotate_alert(
        export_alert,
        "User denies activity. Investigating potential account compromise.",
    )?;
    dir.add_investigation_step(export_alert, "Reviewed badge access logs - no entry recorded")?;
    dir.add_investigation_step(export_alert, "Analyzing network logs for source IP")?;
    dir.add_investigation_step(export_alert, "Initiated password reset and MFA enforcement")?;

    // Under investigation; the user confirms business travel.
    let credential_alert = dir.ingest_alert(Alert::new(
        "Compromised Account Indicators",
        "Multiple failed login attempts followed by successful login from new location",
        AlertSeverity::High,
        AlertKind::Security,
        james,
        "James Wilson",
        at(now, 1, 13, 30),
        "Credential Stuffing Detection",
        90,
        vec![
            "Active Directory".to_string(),
            "Executive Systems".to_string(),
        ],
    ))?;
    dir.notify_user(credential_alert, ResponseChannel::AppNotification, &dispatcher)?;
    dir.record_response(
        credential_alert,
        ResponseVerdict::Confirmed,
        "Yes, this was me. I was traveling for the board meeting and had to use \
         the hotel business center computer.",
    )?;
    dir.open_alert(credential_alert)?;
    dir.add_investigation_step(
        credential_alert,
        "Confirmed business travel authorization in HR system",
    )?;
    dir.add_investigation_step(
        credential_alert,
        "Verified hotel location matches login geolocation",
    )?;

    // New, user already confirmed out-of-band.
    let access_alert = dir.ingest_alert(Alert::new(
        "Unauthorized Cross-Department Access",
        "HR manager accessed financial systems outside normal job responsibilities",
        AlertSeverity::Medium,
        AlertKind::Access,
        emily,
        "Emily Rodriguez",
        at(now, 0, 14, 45),
        "Role-Based Access Violation",
        65,
        vec!["Financial Database".to_string(), "Payroll System".to_string()],
    ))?;
    dir.notify_user(access_alert, ResponseChannel::Email, &dispatcher)?;
    dir.record_response(
        access_alert,
        ResponseVerdict::Confirmed,
        "I was asked by the CFO to pull salary data for the annual compensation review.",
    )?;

    // New, prompt sent, no reply yet.
    let escalation_alert = dir.ingest_alert(Alert::new(
        "Privilege Escalation Attempt",
        "User attempted to access admin-level functions without authorization",
        AlertSeverity::High,
        AlertKind::Security,
        robert,
        "Robert Martinez",
        at(now, 1, 15, 15),
        "Privilege Escalation Detection",
        80,
        vec![
            "User Management".to_string(),
            "System Configuration".to_string(),
        ],
    ))?;
    dir.notify_user(escalation_alert, ResponseChannel::Sms, &dispatcher)?;

    // Investigated and resolved after the user confirmed weekend work.
    let off_hours_alert = dir.ingest_alert(Alert::new(
        "Off-Hours Access",
        "Development environment access during the weekend",
        AlertSeverity::Low,
        AlertKind::Behavior,
        michael,
        "Michael Chen",
        at(now, 2, 22, 15),
        "Off-Hours Access Detection",
        25,
        vec!["Development Environment".to_string()],
    ))?;
    dir.notify_user(off_hours_alert, ResponseChannel::Sms, &dispatcher)?;
    dir.record_response(
        off_hours_alert,
        ResponseVerdict::Confirmed,
        "I was finishing the critical bug fix for Monday's production deployment.",
    )?;
    dir.open_alert(off_hours_alert)?;
    dir.resolve_alert(
        off_hours_alert,
        TransitionOptions::with_notes("Confirmed legitimate weekend work"),
    )?;

    // Opened and dismissed as a benign hardware refresh.
    let device_alert = dir.ingest_alert(Alert::new(
        "New Device Registration",
        "First login from an unrecognized laptop",
        AlertSeverity::Low,
        AlertKind::Login,
        david,
        "David Kim",
        at(now, 1, 10, 0),
        "New Device Detection",
        20,
        vec!["Marketing Tools".to_string()],
    ))?;
    dir.open_alert(device_alert)?;
    dir.dismiss_alert(
        device_alert,
        TransitionOptions::with_notes("Company laptop from the hardware refresh program"),
    )?;

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::AlertStatus;
    use crate::risk::RiskLevel;

    #[test]
    fn test_demo_directory_builds() {
        let dir = demo_directory().unwrap();
        assert_eq!(dir.users().len(), 6);
        assert_eq!(dir.alerts().len(), 6);
    }

    #[test]
    fn test_demo_scores_are_computed_not_hard_coded() {
        let dir = demo_directory().unwrap();

        // Sarah: elevated (15) + Finance (20) + 2 months (20) + two critical
        // (50) + one suspicious (10) + two off-hours (10) + three distinct
        // locations (10) = 135 -> high
        let sarah = dir
            .users()
            .iter()
            .find(|u| u.profile.email == "sarah.johnson@company.com")
            .unwrap();
        assert_eq!(sarah.assessment().score, 135);
        assert_eq!(sarah.assessment().level, RiskLevel::High);

        // David: basic (0) + Marketing (5) + veteran (0), clean history = 5
        let david = dir
            .users()
            .iter()
            .find(|u| u.profile.email == "david.kim@company.com")
            .unwrap();
        assert_eq!(david.assessment().score, 5);
        assert_eq!(david.assessment().level, RiskLevel::Low);
    }

    #[test]
    fn test_demo_covers_every_lifecycle_state() {
        let dir = demo_directory().unwrap();
        for status in [
            AlertStatus::Active,
            AlertStatus::Investigating,
            AlertStatus::Dismissed,
            AlertStatus::Resolved,
        ] {
            assert!(
                dir.alerts().iter().any(|a| a.status == status),
                "no demo alert in status {status}"
            );
        }
    }

    #[test]
    fn test_demo_response_states() {
        let dir = demo_directory().unwrap();
        let denied = dir
            .alerts()
            .iter()
            .filter(|a| matches!(a.user_response.verdict(), Some(ResponseVerdict::Denied)))
            .count();
        let awaiting = dir
            .alerts()
            .iter()
            .filter(|a| {
                !a.user_response.is_recorded()
                    && !matches!(
                        a.user_response,
                        crate::models::alert::UserResponse::NotNotified
                    )
            })
            .count();
        assert_eq!(denied, 1);
        assert_eq!(awaiting, 1);
    }
}
