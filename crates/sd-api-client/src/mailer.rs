//! Notification mail.
//!
//! Password resets and project assignment changes are mailed through EmailJS.
//! The store only sees the [`NotificationMailer`] port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{serde_as, DurationSeconds};
use std::env;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// EmailJS send endpoint.
pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

const ADDED_TEXT: &str = "You have been added to the project team. Your skills and expertise will be valuable assets to this project. We look forward to your contributions and collaboration with the team.";
const REMOVED_TEXT: &str = "You have been removed from the project team. We appreciate the work and effort you've put into this project. If you have any questions about this change, please don't hesitate to reach out to your manager or the project lead.";

/// Kind of membership change reported by a project update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentChange {
    Added,
    Removed,
}

impl AssignmentChange {
    /// Parse the `message` field of a project message (`"add"` / `"remove"`).
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Self::Added),
            "remove" => Some(Self::Removed),
            _ => None,
        }
    }

    /// Body text sent to the member.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Added => ADDED_TEXT,
            Self::Removed => REMOVED_TEXT,
        }
    }
}

/// A mail to send.
#[derive(Clone, PartialEq, Eq)]
pub enum Notification {
    PasswordReset {
        email: String,
        new_password: String,
    },
    ProjectAssignment {
        to_email: String,
        project_name: String,
        change: AssignmentChange,
    },
}

impl Notification {
    /// Recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::PasswordReset { email, .. } => email,
            Self::ProjectAssignment { to_email, .. } => to_email,
        }
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordReset { email, .. } => f
                .debug_struct("PasswordReset")
                .field("email", email)
                .field("new_password", &"<redacted>")
                .finish(),
            Self::ProjectAssignment {
                to_email,
                project_name,
                change,
            } => f
                .debug_struct("ProjectAssignment")
                .field("to_email", to_email)
                .field("project_name", project_name)
                .field("change", change)
                .finish(),
        }
    }
}

/// Mail delivery failures.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail service responded {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound mail port.
#[async_trait]
pub trait NotificationMailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), MailError>;
}

/// EmailJS account settings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Send endpoint
    pub endpoint: String,
    /// EmailJS service id
    pub service_id: String,
    /// EmailJS public key
    pub user_id: String,
    /// Template for password reset mails (`email`, `newPassword`)
    pub password_reset_template: String,
    /// Template for assignment mails (`to_email`, `project_name`, `message`)
    pub assignment_template: String,
    /// Request timeout in seconds
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            endpoint: EMAILJS_SEND_URL.to_string(),
            service_id: String::new(),
            user_id: String::new(),
            password_reset_template: String::new(),
            assignment_template: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl MailerConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SD_EMAILJS_ENDPOINT`
    /// - `SD_EMAILJS_SERVICE_ID`
    /// - `SD_EMAILJS_USER_ID`
    /// - `SD_EMAILJS_RESET_TEMPLATE`
    /// - `SD_EMAILJS_ASSIGNMENT_TEMPLATE`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: String| env::var(key).unwrap_or(default);
        Self {
            endpoint: var("SD_EMAILJS_ENDPOINT", defaults.endpoint),
            service_id: var("SD_EMAILJS_SERVICE_ID", defaults.service_id),
            user_id: var("SD_EMAILJS_USER_ID", defaults.user_id),
            password_reset_template: var("SD_EMAILJS_RESET_TEMPLATE", defaults.password_reset_template),
            assignment_template: var("SD_EMAILJS_ASSIGNMENT_TEMPLATE", defaults.assignment_template),
            timeout: defaults.timeout,
        }
    }

    /// True when every id needed to send is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("emailjs endpoint", &self.endpoint),
            ("emailjs service_id", &self.service_id),
            ("emailjs user_id", &self.user_id),
            ("emailjs password reset template", &self.password_reset_template),
            ("emailjs assignment template", &self.assignment_template),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptySecret(name));
            }
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("mailer timeout cannot be 0".into()));
        }
        Ok(())
    }
}

/// Mailer that posts to the EmailJS REST API.
pub struct EmailJsMailer {
    http: reqwest::Client,
    config: MailerConfig,
}

impl EmailJsMailer {
    pub fn new(config: MailerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("mail client: {e}")))?;
        Ok(Self { http, config })
    }

    fn request_body(&self, notification: &Notification) -> serde_json::Value {
        let (template_id, params) = match notification {
            Notification::PasswordReset {
                email,
                new_password,
            } => (
                &self.config.password_reset_template,
                json!({ "email": email, "newPassword": new_password }),
            ),
            Notification::ProjectAssignment {
                to_email,
                project_name,
                change,
            } => (
                &self.config.assignment_template,
                json!({
                    "to_email": to_email,
                    "project_name": project_name,
                    "message": change.text(),
                }),
            ),
        };
        json!({
            "service_id": self.config.service_id,
            "template_id": template_id,
            "user_id": self.config.user_id,
            "template_params": params,
        })
    }
}

#[async_trait]
impl NotificationMailer for EmailJsMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&self.request_body(notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %notification.recipient(), "Notification mailed");
        Ok(())
    }
}

/// Mailer for unconfigured installs: logs what would have been sent.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl NotificationMailer for LogMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        tracing::warn!(
            to = %notification.recipient(),
            notification = ?notification,
            "Mailer not configured, notification not sent"
        );
        Ok(())
    }
}

/// Mailer that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationMailer for RecordingMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        Ok(())
    }
}
