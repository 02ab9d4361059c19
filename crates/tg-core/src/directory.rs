//! In-memory directory of scored users and their alerts.
//!
//! The directory is the aggregate the presentation layer works against. It
//! is built in one explicit step from raw user records — every user is
//! scored during construction, so there is no window where a stored risk
//! level disagrees with the stored history. Afterwards, appending an
//! activity is the only operation that changes a user's assessment, and it
//! recomputes the assessment in the same call.
//!
//! All operations are synchronous and run to completion; the directory
//! assumes a single logical operator at a time and carries no locking.

use crate::models::activity::Activity;
use crate::models::alert::{Alert, ResponseChannel, ResponseVerdict};
use crate::models::user::{ScoredUser, UserRecord};
use crate::notification::{PromptDispatcher, VerificationPrompt};
use crate::risk::{self, RiskAssessment, RiskWeights};
use crate::triage::{self, TransitionOptions, TriageAction, TriageError};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

/// Directory of monitored users and the alerts raised against them.
#[derive(Debug, Clone)]
pub struct SecurityDirectory {
    users: Vec<ScoredUser>,
    alerts: Vec<Alert>,
    weights: RiskWeights,
}

impl SecurityDirectory {
    /// Builds a directory from raw records, scoring every user against the
    /// evaluation instant `as_of`.
    pub fn from_records(
        records: Vec<UserRecord>,
        weights: RiskWeights,
        as_of: DateTime<Utc>,
    ) -> Self {
        let users = records
            .into_iter()
            .map(|record| {
                let assessment =
                    risk::assess(&record.profile, &record.activities, &weights, as_of);
                ScoredUser::new(record, assessment)
            })
            .collect::<Vec<_>>();

        info!(user_count = users.len(), "directory initialized");
        Self {
            users,
            alerts: Vec::new(),
            weights,
        }
    }

    /// The scoring weights this directory was built with.
    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// All users, in insertion order.
    pub fn users(&self) -> &[ScoredUser] {
        &self.users
    }

    /// All alerts, in ingestion order.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Looks up a user by id.
    pub fn user(&self, id: Uuid) -> Result<&ScoredUser, TriageError> {
        self.users
            .iter()
            .find(|u| u.profile.id == id)
            .ok_or(TriageError::UnknownUser(id))
    }

    /// Looks up an alert by id.
    pub fn alert(&self, id: Uuid) -> Result<&Alert, TriageError> {
        self.alerts
            .iter()
            .find(|a| a.id == id)
            .ok_or(TriageError::UnknownAlert(id))
    }

    fn user_mut(&mut self, id: Uuid) -> Result<&mut ScoredUser, TriageError> {
        self.users
            .iter_mut()
            .find(|u| u.profile.id == id)
            .ok_or(TriageError::UnknownUser(id))
    }

    fn alert_mut(&mut self, id: Uuid) -> Result<&mut Alert, TriageError> {
        self.alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(TriageError::UnknownAlert(id))
    }

    /// Appends an activity from the ingestion pipeline and recomputes the
    /// user's assessment. Returns the fresh assessment.
    pub fn append_activity(
        &mut self,
        user_id: Uuid,
        activity: Activity,
        as_of: DateTime<Utc>,
    ) -> Result<&RiskAssessment, TriageError> {
        let weights = self.weights.clone();
        let user = self.user_mut(user_id)?;
        user.activities.push(activity);
        let assessment = risk::assess(&user.profile, &user.activities, &weights, as_of);
        user.set_assessment(assessment);
        Ok(user.assessment())
    }

    /// Recomputes every user's assessment, e.g. after a weights change or
    /// on a scheduled re-evaluation.
    pub fn rescore_all(&mut self, as_of: DateTime<Utc>) {
        let weights = self.weights.clone();
        for user in &mut self.users {
            let assessment = risk::assess(&user.profile, &user.activities, &weights, as_of);
            user.set_assessment(assessment);
        }
    }

    /// Accepts an alert from the detection rule engine. Alerts referencing
    /// a user the directory does not know are rejected.
    pub fn ingest_alert(&mut self, alert: Alert) -> Result<Uuid, TriageError> {
        self.user(alert.user_id)?;
        let id = alert.id;
        info!(alert_id = %id, rule = %alert.rule, "alert ingested");
        self.alerts.push(alert);
        Ok(id)
    }

    /// Opens an alert for investigation.
    pub fn open_alert(&mut self, id: Uuid) -> Result<&Alert, TriageError> {
        let alert = self.alert_mut(id)?;
        triage::transition(alert, TriageAction::Open, TransitionOptions::default())?;
        Ok(alert)
    }

    /// Dismisses an alert under investigation.
    pub fn dismiss_alert(
        &mut self,
        id: Uuid,
        opts: TransitionOptions,
    ) -> Result<&Alert, TriageError> {
        let alert = self.alert_mut(id)?;
        triage::transition(alert, TriageAction::Dismiss, opts)?;
        Ok(alert)
    }

    /// Resolves an alert under investigation.
    pub fn resolve_alert(
        &mut self,
        id: Uuid,
        opts: TransitionOptions,
    ) -> Result<&Alert, TriageError> {
        let alert = self.alert_mut(id)?;
        triage::transition(alert, TriageAction::Resolve, opts)?;
        Ok(alert)
    }

    /// Sends a "was this you?" prompt for an alert through the dispatcher
    /// and marks the user as notified.
    ///
    /// Delivery is fire-and-forget: a dispatcher failure is logged but the
    /// alert still moves to the awaiting-response state.
    pub fn notify_user(
        &mut self,
        alert_id: Uuid,
        channel: ResponseChannel,
        dispatcher: &dyn PromptDispatcher,
    ) -> Result<(), TriageError> {
        let alert = self.alert_mut(alert_id)?;
        triage::mark_notified(alert, channel)?;

        let prompt = VerificationPrompt::for_alert(alert, channel);
        if let Err(err) = dispatcher.deliver(&prompt) {
            warn!(alert_id = %alert_id, %err, "verification prompt delivery failed");
        }
        Ok(())
    }

    /// Replaces the operator notes on an alert.
    pub fn annotate_alert(
        &mut self,
        alert_id: Uuid,
        notes: impl Into<String>,
    ) -> Result<(), TriageError> {
        let alert = self.alert_mut(alert_id)?;
        alert.admin_notes = Some(notes.into());
        Ok(())
    }

    /// Appends a step to an alert's investigation log.
    pub fn add_investigation_step(
        &mut self,
        alert_id: Uuid,
        step: impl Into<String>,
    ) -> Result<(), TriageError> {
        let alert = self.alert_mut(alert_id)?;
        alert.add_investigation_step(step);
        Ok(())
    }

    /// Records the flagged user's reply to an outstanding prompt.
    pub fn record_response(
        &mut self,
        alert_id: Uuid,
        verdict: ResponseVerdict,
        explanation: impl Into<String>,
    ) -> Result<(), TriageError> {
        let alert = self.alert_mut(alert_id)?;
        triage::record_response(alert, verdict, explanation)
    }

    /// Alerts still requiring operator attention, in ingestion order.
    pub fn active_alerts(&self) -> Vec<&Alert> {
        triage::active_view(&self.alerts)
    }

    /// Alerts whose lifecycle has ended, in ingestion order.
    pub fn resolved_alerts(&self) -> Vec<&Alert> {
        triage::resolved_view(&self.alerts)
    }

    /// All alerts referencing a user, in ingestion order. A user with no
    /// alerts yields an empty list.
    pub fn alerts_for_user(&self, user_id: Uuid) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.user_id == user_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{ActivityKind, ActivityRiskLevel};
    use crate::models::alert::{AlertKind, AlertSeverity, AlertStatus, UserResponse};
    use crate::models::user::{AccessLevel, Department, UserProfile};
    use crate::notification::MockDispatcher;
    use crate::risk::RiskLevel;
    use chrono::{Duration, TimeZone};

    fn eval_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn finance_analyst() -> UserRecord {
        let join = (eval_time() - Duration::days(60)).date_naive();
        UserRecord {
            profile: UserProfile::new(
                "Sarah Johnson",
                "sarah.johnson@company.com",
                Department::Finance,
                "Senior Financial Analyst",
                AccessLevel::Elevated,
                Some(join),
            ),
            activities: Vec::new(),
        }
    }

    fn veteran_engineer() -> UserRecord {
        let join = chrono::NaiveDate::from_ymd_opt(2019, 3, 10).unwrap();
        UserRecord {
            profile: UserProfile::new(
                "Michael Chen",
                "michael.chen@company.com",
                Department::Engineering,
                "Senior Software Engineer",
                AccessLevel::Basic,
                Some(join),
            ),
            activities: Vec::new(),
        }
    }

    fn directory() -> SecurityDirectory {
        SecurityDirectory::from_records(
            vec![finance_analyst(), veteran_engineer()],
            RiskWeights::default(),
            eval_time(),
        )
    }

    fn alert_for(user: &ScoredUser) -> Alert {
        Alert::new(
            "Suspicious Data Export",
            "Large volume of customer data exported during off-hours",
            AlertSeverity::High,
            AlertKind::File,
            user.profile.id,
            user.profile.name.clone(),
            eval_time(),
            "Bulk Data Export Detection",
            85,
            vec!["Customer Database".to_string()],
        )
    }

    fn critical_export() -> Activity {
        Activity::new(
            ActivityKind::DataExport,
            "Downloaded customer database",
            Utc.with_ymd_and_hms(2025, 6, 14, 23, 30, 0).unwrap(),
            "Coffee Shop WiFi",
            "Personal Laptop",
            "45.123.78.90",
            ActivityRiskLevel::Critical,
        )
    }

    #[test]
    fn test_init_scores_every_user() {
        let dir = directory();
        // elevated (15) + Finance (20) + 2 months (20) = 55 -> medium
        let sarah = &dir.users()[0];
        assert_eq!(sarah.assessment().score, 55);
        assert_eq!(sarah.assessment().level, RiskLevel::Medium);
        // basic (0) + Engineering (10) + veteran (0) = 10 -> low
        let michael = &dir.users()[1];
        assert_eq!(michael.assessment().score, 10);
        assert_eq!(michael.assessment().level, RiskLevel::Low);
    }

    #[test]
    fn test_unknown_lookups() {
        let dir = directory();
        let missing = Uuid::new_v4();
        assert_eq!(dir.user(missing), Err(TriageError::UnknownUser(missing)));
        assert_eq!(dir.alert(missing), Err(TriageError::UnknownAlert(missing)));
    }

    #[test]
    fn test_append_activity_recomputes_assessment() {
        let mut dir = directory();
        let sarah_id = dir.users()[0].profile.id;
        let before = dir.user(sarah_id).unwrap().assessment().score;

        // critical export (25) + off-hours (5)
        let assessment = dir
            .append_activity(sarah_id, critical_export(), eval_time())
            .unwrap();
        assert_eq!(assessment.score, before + 30);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_append_activity_unknown_user() {
        let mut dir = directory();
        let result = dir.append_activity(Uuid::new_v4(), critical_export(), eval_time());
        assert!(matches!(result, Err(TriageError::UnknownUser(_))));
    }

    #[test]
    fn test_ingest_alert_rejects_unknown_user() {
        let mut dir = directory();
        let mut alert = alert_for(&dir.users()[0].clone());
        alert.user_id = Uuid::new_v4();
        assert!(matches!(
            dir.ingest_alert(alert),
            Err(TriageError::UnknownUser(_))
        ));
    }

    #[test]
    fn test_triage_through_directory() {
        let mut dir = directory();
        let alert_id = dir.ingest_alert(alert_for(&dir.users()[0].clone())).unwrap();

        // Direct resolve from active is rejected.
        let result = dir.resolve_alert(alert_id, TransitionOptions::default());
        assert!(matches!(
            result,
            Err(TriageError::InvalidTransition { .. })
        ));

        dir.open_alert(alert_id).unwrap();
        let alert = dir
            .resolve_alert(alert_id, TransitionOptions::with_notes("Credentials rotated"))
            .unwrap();
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert!(alert.resolved_at.is_some());
    }

    #[test]
    fn test_notify_is_fire_and_forget() {
        let mut dir = directory();
        let alert_id = dir.ingest_alert(alert_for(&dir.users()[0].clone())).unwrap();

        let dispatcher = MockDispatcher::failing();
        dir.notify_user(alert_id, ResponseChannel::Email, &dispatcher)
            .unwrap();

        // Delivery failed but the response state still advanced.
        assert!(matches!(
            dir.alert(alert_id).unwrap().user_response,
            UserResponse::AwaitingResponse { .. }
        ));
    }

    #[test]
    fn test_notify_and_record_response() {
        let mut dir = directory();
        let alert_id = dir.ingest_alert(alert_for(&dir.users()[0].clone())).unwrap();

        let dispatcher = MockDispatcher::new();
        dir.notify_user(alert_id, ResponseChannel::AppNotification, &dispatcher)
            .unwrap();
        assert_eq!(dispatcher.delivered().len(), 1);

        dir.record_response(alert_id, ResponseVerdict::Denied, "That was not me")
            .unwrap();
        assert!(dir.alert(alert_id).unwrap().user_response.is_recorded());
    }

    #[test]
    fn test_alert_views_and_user_lookup() {
        let mut dir = directory();
        let sarah = dir.users()[0].clone();
        let michael = dir.users()[1].clone();

        let first = dir.ingest_alert(alert_for(&sarah)).unwrap();
        let second = dir.ingest_alert(alert_for(&michael)).unwrap();
        let third = dir.ingest_alert(alert_for(&sarah)).unwrap();

        dir.open_alert(second).unwrap();
        dir.dismiss_alert(second, TransitionOptions::default()).unwrap();

        let active: Vec<Uuid> = dir.active_alerts().iter().map(|a| a.id).collect();
        assert_eq!(active, vec![first, third]);
        let resolved: Vec<Uuid> = dir.resolved_alerts().iter().map(|a| a.id).collect();
        assert_eq!(resolved, vec![second]);

        assert_eq!(dir.alerts_for_user(sarah.profile.id).len(), 2);
        assert_eq!(dir.alerts_for_user(michael.profile.id).len(), 1);
        assert!(dir.alerts_for_user(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_rescore_all_applies_current_weights() {
        let mut dir = directory();
        let sarah_id = dir.users()[0].profile.id;
        let original = dir.user(sarah_id).unwrap().assessment().score;

        // A year later the tenure weight decays and the score drops.
        let later = eval_time() + Duration::days(365);
        dir.rescore_all(later);
        let rescored = dir.user(sarah_id).unwrap().assessment().score;
        assert!(rescored < original);
    }
}
