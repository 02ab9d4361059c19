//! Triage state machine for alerts.
//!
//! Alerts move through `active → investigating → {dismissed | resolved}`,
//! driven only by operator actions. The adjacency list is enforced
//! explicitly: the only way out of `active` is to open the alert, and the
//! terminal states are reachable only from `investigating`.
//!
//! The "was this you?" exchange is out-of-band: a prompt can go out and a
//! reply can come back in any state without changing the alert's status.
//! The reply is evidence for the operator, who decides the next transition.

use crate::models::alert::{
    Alert, AlertStatus, ResponseChannel, ResponseVerdict, UserResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Operator actions that drive the alert lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriageAction {
    /// Open the alert for investigation.
    Open,
    /// Close the alert as benign or not actionable.
    Dismiss,
    /// Close the alert after investigation completed.
    Resolve,
}

impl std::fmt::Display for TriageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriageAction::Open => write!(f, "open"),
            TriageAction::Dismiss => write!(f, "dismiss"),
            TriageAction::Resolve => write!(f, "resolve"),
        }
    }
}

/// Errors surfaced by triage operations. None are recovered locally; the
/// caller decides presentation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TriageError {
    #[error("cannot {action} an alert in status {from}")]
    InvalidTransition {
        /// Status the alert was in when the action was attempted.
        from: AlertStatus,
        /// The attempted action.
        action: TriageAction,
    },

    #[error("unknown user: {0}")]
    UnknownUser(Uuid),

    #[error("unknown alert: {0}")]
    UnknownAlert(Uuid),

    #[error("alert {0} already has a recorded user response")]
    ResponseAlreadyRecorded(Uuid),

    #[error("alert {0} has no outstanding verification prompt")]
    UserNotNotified(Uuid),
}

/// Options carried by a triage transition.
#[derive(Debug, Clone, Default)]
pub struct TransitionOptions {
    /// Free-text notes the operator attaches when closing the alert.
    pub notes: Option<String>,
}

impl TransitionOptions {
    /// Options with operator notes attached.
    pub fn with_notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
        }
    }
}

/// The target status for an action from the given status, if the
/// transition is legal. This is the whole adjacency list.
fn next_status(from: AlertStatus, action: TriageAction) -> Option<AlertStatus> {
    match (from, action) {
        (AlertStatus::Active, TriageAction::Open) => Some(AlertStatus::Investigating),
        (AlertStatus::Investigating, TriageAction::Dismiss) => Some(AlertStatus::Dismissed),
        (AlertStatus::Investigating, TriageAction::Resolve) => Some(AlertStatus::Resolved),
        _ => None,
    }
}

/// Applies an operator action to an alert.
///
/// Terminal transitions stamp `resolved_at` and attach any operator notes,
/// keeping the invariant that `resolved_at` is present exactly when the
/// status is terminal. Illegal actions fail with
/// [`TriageError::InvalidTransition`] and leave the alert untouched.
pub fn transition(
    alert: &mut Alert,
    action: TriageAction,
    opts: TransitionOptions,
) -> Result<(), TriageError> {
    let from = alert.status;
    let to = next_status(from, action).ok_or(TriageError::InvalidTransition { from, action })?;

    alert.status = to;
    if to.is_terminal() {
        alert.resolved_at = Some(Utc::now());
        if opts.notes.is_some() {
            alert.admin_notes = opts.notes;
        }
    }

    info!(alert_id = %alert.id, %from, %to, "alert transitioned");
    Ok(())
}

/// Marks the flagged user as notified over the given channel.
///
/// Legal in any alert status; never changes `status`. Fails once a verdict
/// has been recorded, since the response is immutable history.
pub fn mark_notified(alert: &mut Alert, channel: ResponseChannel) -> Result<(), TriageError> {
    if alert.user_response.is_recorded() {
        return Err(TriageError::ResponseAlreadyRecorded(alert.id));
    }
    alert.user_response = UserResponse::AwaitingResponse {
        channel,
        notified_at: Utc::now(),
    };
    debug!(alert_id = %alert.id, %channel, "verification prompt sent");
    Ok(())
}

/// Records the flagged user's reply to an outstanding prompt.
///
/// Requires an outstanding prompt: a reply cannot arrive for a user who was
/// never asked, and a recorded verdict cannot be overwritten.
pub fn record_response(
    alert: &mut Alert,
    verdict: ResponseVerdict,
    explanation: impl Into<String>,
) -> Result<(), TriageError> {
    let channel = match &alert.user_response {
        UserResponse::AwaitingResponse { channel, .. } => *channel,
        UserResponse::NotNotified => return Err(TriageError::UserNotNotified(alert.id)),
        UserResponse::Confirmed { .. } | UserResponse::Denied { .. } => {
            return Err(TriageError::ResponseAlreadyRecorded(alert.id))
        }
    };

    let explanation = explanation.into();
    let responded_at = Utc::now();
    alert.user_response = match verdict {
        ResponseVerdict::Confirmed => UserResponse::Confirmed {
            explanation,
            channel,
            responded_at,
        },
        ResponseVerdict::Denied => UserResponse::Denied {
            explanation,
            channel,
            responded_at,
        },
    };
    info!(alert_id = %alert.id, ?verdict, "user response recorded");
    Ok(())
}

/// Alerts still requiring operator attention, in original order.
pub fn active_view(alerts: &[Alert]) -> Vec<&Alert> {
    alerts
        .iter()
        .filter(|a| !a.status.is_terminal())
        .collect()
}

/// Alerts whose lifecycle has ended, in original order.
pub fn resolved_view(alerts: &[Alert]) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.status.is_terminal()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::{AlertKind, AlertSeverity};

    fn test_alert() -> Alert {
        Alert::new(
            "Privilege Escalation Attempt",
            "User attempted to access admin-level functions",
            AlertSeverity::High,
            AlertKind::Security,
            Uuid::new_v4(),
            "Robert Martinez",
            Utc::now(),
            "Privilege Escalation Detection",
            80,
            vec!["User Management".to_string()],
        )
    }

    fn alert_with_status(status: AlertStatus) -> Alert {
        let mut alert = test_alert();
        alert.status = status;
        if status.is_terminal() {
            alert.resolved_at = Some(Utc::now());
        }
        alert
    }

    #[test]
    fn test_open_from_active() {
        let mut alert = test_alert();
        transition(&mut alert, TriageAction::Open, TransitionOptions::default()).unwrap();
        assert_eq!(alert.status, AlertStatus::Investigating);
        assert!(alert.resolved_at.is_none());
    }

    #[test]
    fn test_resolve_from_active_is_rejected() {
        let mut alert = test_alert();
        let result = transition(&mut alert, TriageAction::Resolve, TransitionOptions::default());
        assert_eq!(
            result,
            Err(TriageError::InvalidTransition {
                from: AlertStatus::Active,
                action: TriageAction::Resolve,
            })
        );
        // The alert is untouched.
        assert_eq!(alert.status, AlertStatus::Active);
        assert!(alert.resolved_at.is_none());
    }

    #[test]
    fn test_dismiss_from_active_is_rejected() {
        let mut alert = test_alert();
        let result = transition(&mut alert, TriageAction::Dismiss, TransitionOptions::default());
        assert!(matches!(
            result,
            Err(TriageError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_resolve_from_investigating_stamps_resolved_at() {
        let mut alert = alert_with_status(AlertStatus::Investigating);
        alert.resolved_at = None;
        transition(&mut alert, TriageAction::Resolve, TransitionOptions::default()).unwrap();
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert!(alert.resolved_at.is_some());
    }

    #[test]
    fn test_dismiss_with_notes() {
        let mut alert = alert_with_status(AlertStatus::Investigating);
        alert.resolved_at = None;
        transition(
            &mut alert,
            TriageAction::Dismiss,
            TransitionOptions::with_notes("Confirmed legitimate business travel"),
        )
        .unwrap();
        assert_eq!(alert.status, AlertStatus::Dismissed);
        assert!(alert.resolved_at.is_some());
        assert_eq!(
            alert.admin_notes.as_deref(),
            Some("Confirmed legitimate business travel")
        );
    }

    #[test]
    fn test_terminal_states_accept_no_actions() {
        for status in [AlertStatus::Dismissed, AlertStatus::Resolved] {
            for action in [TriageAction::Open, TriageAction::Dismiss, TriageAction::Resolve] {
                let mut alert = alert_with_status(status);
                let result = transition(&mut alert, action, TransitionOptions::default());
                assert!(
                    matches!(result, Err(TriageError::InvalidTransition { .. })),
                    "{action} from {status} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_reopen_investigating_is_rejected() {
        let mut alert = alert_with_status(AlertStatus::Investigating);
        let result = transition(&mut alert, TriageAction::Open, TransitionOptions::default());
        assert!(matches!(
            result,
            Err(TriageError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_notify_and_record_do_not_change_status() {
        for status in [
            AlertStatus::Active,
            AlertStatus::Investigating,
            AlertStatus::Dismissed,
            AlertStatus::Resolved,
        ] {
            let mut alert = alert_with_status(status);
            mark_notified(&mut alert, ResponseChannel::Email).unwrap();
            assert_eq!(alert.status, status);

            record_response(&mut alert, ResponseVerdict::Denied, "That was not me").unwrap();
            assert_eq!(alert.status, status);
            assert!(alert.user_response.is_recorded());
        }
    }

    #[test]
    fn test_response_requires_prompt() {
        let mut alert = test_alert();
        let result = record_response(&mut alert, ResponseVerdict::Confirmed, "It was me");
        assert_eq!(result, Err(TriageError::UserNotNotified(alert.id)));
    }

    #[test]
    fn test_recorded_response_is_immutable() {
        let mut alert = test_alert();
        mark_notified(&mut alert, ResponseChannel::Sms).unwrap();
        record_response(&mut alert, ResponseVerdict::Confirmed, "Working over the weekend")
            .unwrap();

        let result = record_response(&mut alert, ResponseVerdict::Denied, "Changed my mind");
        assert_eq!(result, Err(TriageError::ResponseAlreadyRecorded(alert.id)));
        assert_eq!(
            alert.user_response.verdict(),
            Some(ResponseVerdict::Confirmed)
        );

        let result = mark_notified(&mut alert, ResponseChannel::Email);
        assert_eq!(result, Err(TriageError::ResponseAlreadyRecorded(alert.id)));
    }

    #[test]
    fn test_awaiting_response_is_valid_placeholder() {
        let mut alert = test_alert();
        mark_notified(&mut alert, ResponseChannel::AppNotification).unwrap();
        assert!(!alert.user_response.is_recorded());
        assert!(matches!(
            alert.user_response,
            UserResponse::AwaitingResponse { .. }
        ));
    }

    #[test]
    fn test_views_partition_and_preserve_order() {
        let alerts = vec![
            alert_with_status(AlertStatus::Active),
            alert_with_status(AlertStatus::Investigating),
            alert_with_status(AlertStatus::Dismissed),
            alert_with_status(AlertStatus::Resolved),
        ];

        let active = active_view(&alerts);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, alerts[0].id);
        assert_eq!(active[1].id, alerts[1].id);

        let resolved = resolved_view(&alerts);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id, alerts[2].id);
        assert_eq!(resolved[1].id, alerts[3].id);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut alert = test_alert();
        mark_notified(&mut alert, ResponseChannel::Email).unwrap();
        transition(&mut alert, TriageAction::Open, TransitionOptions::default()).unwrap();
        alert.add_investigation_step("Reviewed badge access logs");
        record_response(&mut alert, ResponseVerdict::Denied, "I was at a family dinner").unwrap();
        transition(
            &mut alert,
            TriageAction::Resolve,
            TransitionOptions::with_notes("Account compromise confirmed, credentials rotated"),
        )
        .unwrap();

        assert_eq!(alert.status, AlertStatus::Resolved);
        assert!(alert.resolved_at.is_some());
        assert_eq!(alert.investigation_steps.len(), 1);
        assert_eq!(alert.user_response.verdict(), Some(ResponseVerdict::Denied));
    }
}
