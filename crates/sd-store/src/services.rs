//! Standalone services that are not backed by a slice.
//!
//! - Password reset: the server generates a password, the mailer sends it.
//! - Assignment notifier: mails every membership change a project update
//!   publishes on the bus.

use sd_api_client::{
    ApiClient, ApiError, AssignmentChange, MailError, Notification, NotificationMailer,
};
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, StoreEvent, Subscription};
use shared_types::ProjectMessage;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("server did not return a new password for {email}")]
    MissingPassword { email: String },

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Reset the password of `email` and mail the new one to it.
pub async fn reset_password(
    api: &ApiClient,
    mailer: &dyn NotificationMailer,
    email: &str,
) -> Result<(), ServiceError> {
    let response = api.reset_password(email).await?;
    let new_password = response
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServiceError::MissingPassword {
            email: email.to_string(),
        })?;

    mailer
        .send(&Notification::PasswordReset {
            email: email.to_string(),
            new_password,
        })
        .await?;
    info!(email = %email, "Password reset mailed");
    Ok(())
}

/// Counts of assignment mails handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub sent: usize,
    pub failed: usize,
    /// Messages whose kind was neither "add" nor "remove".
    pub skipped: usize,
}

impl NotifyReport {
    fn merge(&mut self, other: NotifyReport) {
        self.sent += other.sent;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Mail one notice per assignment message. Failures are logged and counted.
pub async fn notify_assignments(
    mailer: &dyn NotificationMailer,
    messages: &[ProjectMessage],
) -> NotifyReport {
    let mut report = NotifyReport::default();
    for message in messages {
        let Some(change) = AssignmentChange::from_kind(&message.message) else {
            warn!(kind = %message.message, to = %message.email, "Unknown assignment change, not mailed");
            report.skipped += 1;
            continue;
        };
        let notification = Notification::ProjectAssignment {
            to_email: message.email.clone(),
            project_name: message.project_name.clone(),
            change,
        };
        match mailer.send(&notification).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(error = %e, to = %message.email, "Assignment mail failed");
                report.failed += 1;
            }
        }
    }
    report
}

/// Background task that mails assignment changes as they are published.
pub struct AssignmentNotifier {
    stop: oneshot::Sender<()>,
    task: JoinHandle<NotifyReport>,
}

impl AssignmentNotifier {
    /// Subscribe to notifications on `bus` and start mailing.
    #[must_use]
    pub fn spawn(bus: &InMemoryEventBus, mailer: Arc<dyn NotificationMailer>) -> Self {
        let subscription = bus.subscribe(EventFilter::topics(vec![EventTopic::Notifications]));
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(notify_loop(subscription, mailer, stopped));
        Self { stop, task }
    }

    /// Mail whatever is already queued, then stop.
    pub async fn shutdown(self) -> NotifyReport {
        let _ = self.stop.send(());
        match self.task.await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Assignment notifier task failed");
                NotifyReport::default()
            }
        }
    }
}

async fn notify_loop(
    mut subscription: Subscription,
    mailer: Arc<dyn NotificationMailer>,
    mut stopped: oneshot::Receiver<()>,
) -> NotifyReport {
    let mut report = NotifyReport::default();
    loop {
        tokio::select! {
            biased;
            event = subscription.recv() => match event {
                Some(event) => report.merge(handle(mailer.as_ref(), event).await),
                None => break,
            },
            _ = &mut stopped => {
                for event in subscription.drain() {
                    report.merge(handle(mailer.as_ref(), event).await);
                }
                break;
            }
        }
    }
    debug!(?report, "Assignment notifier stopped");
    report
}

async fn handle(mailer: &dyn NotificationMailer, event: StoreEvent) -> NotifyReport {
    match event {
        StoreEvent::ProjectAssignmentsChanged {
            project_id,
            messages,
        } => {
            debug!(project = %project_id, count = messages.len(), "Mailing assignment changes");
            notify_assignments(mailer, &messages).await
        }
        _ => NotifyReport::default(),
    }
}
