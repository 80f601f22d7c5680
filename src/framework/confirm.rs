//! # Confirmation & Notifications
//!
//! The modal side of a screen: a yes/no question that suspends the delete
//! flow, and transient notices the session raises after every completed
//! operation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

/// How a notice or prompt should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// A yes/no question put to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl Prompt {
    /// A destructive-action warning with the standard button labels.
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Warning,
            confirm_label: "Yes, delete".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// The user's answer to a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub confirmed: bool,
}

impl Decision {
    pub const YES: Decision = Decision { confirmed: true };
    pub const NO: Decision = Decision { confirmed: false };
}

/// A transient message shown after an operation completes.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// `None` keeps the notice up until the user dismisses it.
    pub auto_dismiss: Option<Duration>,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>, dismiss: Duration) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Success,
            auto_dismiss: Some(dismiss),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            severity: Severity::Error,
            auto_dismiss: None,
        }
    }
}

/// Modal confirmation plus notification rendering.
///
/// `confirm` always resolves; a dismissed dialog is a [`Decision::NO`].
#[async_trait]
pub trait ConfirmationService: Send + Sync {
    async fn confirm(&self, prompt: Prompt) -> Decision;

    /// Fire-and-forget.
    fn notify(&self, notice: Notice);
}

/// Headless confirmer: answers every prompt the same way and writes notices
/// to the log.
#[derive(Debug, Clone, Copy)]
pub struct LogConfirmer {
    answer: bool,
}

impl LogConfirmer {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl ConfirmationService for LogConfirmer {
    async fn confirm(&self, prompt: Prompt) -> Decision {
        info!(title = %prompt.title, answer = self.answer, "Confirm");
        Decision {
            confirmed: self.answer,
        }
    }

    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => warn!(title = %notice.title, "{}", notice.message),
            _ => info!(title = %notice.title, "{}", notice.message),
        }
    }
}
