//! Core data models for TrustGuard.

pub mod activity;
pub mod alert;
pub mod user;

pub use activity::{Activity, ActivityKind, ActivityRiskLevel};
pub use alert::{
    Alert, AlertKind, AlertSeverity, AlertStatus, ResponseChannel, ResponseVerdict, UserResponse,
};
pub use user::{AccessLevel, Department, ScoredUser, UserProfile, UserRecord};
