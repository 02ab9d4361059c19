//! Verification prompt delivery seam.
//!
//! When an alert fires, the flagged user is asked "was this you?" over a
//! notification channel. Delivery itself belongs to an external dispatcher;
//! the core only hands over a [`VerificationPrompt`] and records that the
//! user was asked. Delivery failures are logged and do not roll back the
//! local state change.

use crate::models::alert::{Alert, ResponseChannel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Errors an external dispatcher can report.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("delivery over {channel} failed: {reason}")]
    DeliveryFailed {
        /// Channel the delivery was attempted on.
        channel: ResponseChannel,
        /// Dispatcher-provided reason.
        reason: String,
    },
}

/// The "was this you?" payload handed to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationPrompt {
    /// The alert the prompt is about.
    pub alert_id: Uuid,
    /// The user being asked.
    pub user_id: Uuid,
    /// Display name of the user being asked.
    pub user_name: String,
    /// Title of the alert, shown to the user.
    pub alert_title: String,
    /// Detection rule that fired, shown to the user.
    pub rule: String,
    /// Channel to deliver over.
    pub channel: ResponseChannel,
    /// When the prompt was handed to the dispatcher.
    pub sent_at: DateTime<Utc>,
}

impl VerificationPrompt {
    /// Builds a prompt for an alert.
    pub fn for_alert(alert: &Alert, channel: ResponseChannel) -> Self {
        Self {
            alert_id: alert.id,
            user_id: alert.user_id,
            user_name: alert.user_name.clone(),
            alert_title: alert.title.clone(),
            rule: alert.rule.clone(),
            channel,
            sent_at: Utc::now(),
        }
    }
}

/// Delivery seam implemented by the external notification system.
pub trait PromptDispatcher: Send + Sync {
    /// Delivers a prompt to the user. Best effort; the core does not retry.
    fn deliver(&self, prompt: &VerificationPrompt) -> Result<(), DispatchError>;
}

/// In-memory dispatcher that records every prompt. Used in tests and by
/// the demo CLI.
#[derive(Debug, Default)]
pub struct MockDispatcher {
    delivered: Mutex<Vec<VerificationPrompt>>,
    fail_deliveries: bool,
}

impl MockDispatcher {
    /// A dispatcher that accepts every delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that fails every delivery, for exercising the
    /// fire-and-forget path.
    pub fn failing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail_deliveries: true,
        }
    }

    /// Prompts delivered so far.
    pub fn delivered(&self) -> Vec<VerificationPrompt> {
        self.delivered.lock().unwrap().clone()
    }
}

impl PromptDispatcher for MockDispatcher {
    fn deliver(&self, prompt: &VerificationPrompt) -> Result<(), DispatchError> {
        if self.fail_deliveries {
            return Err(DispatchError::DeliveryFailed {
                channel: prompt.channel,
                reason: "mock dispatcher configured to fail".to_string(),
            });
        }
        self.delivered.lock().unwrap().push(prompt.clone());
        Ok(())
    }
}
