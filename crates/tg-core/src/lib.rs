//! # tg-core
//!
//! Core data models, risk scoring, and alert triage for TrustGuard.
//!
//! This crate provides the user/activity/alert data model, the pure risk
//! scorer, the operator-driven triage state machine, and the in-memory
//! directory that ties them together for a presentation layer.

pub mod analytics;
pub mod directory;
pub mod models;
pub mod notification;
pub mod risk;
pub mod seed;
pub mod triage;

pub use analytics::{AlertMetrics, PostureSummary};
pub use directory::SecurityDirectory;
pub use models::{
    AccessLevel, Activity, ActivityKind, ActivityRiskLevel, Alert, AlertKind, AlertSeverity,
    AlertStatus, Department, ResponseChannel, ResponseVerdict, ScoredUser, UserProfile,
    UserRecord, UserResponse,
};
pub use notification::{MockDispatcher, PromptDispatcher, VerificationPrompt};
pub use risk::{assess, RiskAssessment, RiskFactor, RiskLevel, RiskWeights};
pub use triage::{TransitionOptions, TriageAction, TriageError};
