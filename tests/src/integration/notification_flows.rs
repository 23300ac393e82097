//! # Notification Flows
//!
//! 1. **Assignments**: a project update publishes its membership changes and
//!    the notifier mails each one
//! 2. **Password reset**: server-generated password mailed through EmailJS

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sd_api_client::{
        AssignmentChange, EmailJsMailer, MailerConfig, Notification, NotificationMailer,
        RecordingMailer,
    };
    use sd_store::{reset_password, AssignmentNotifier, NotifyReport, Operation, ServiceError};
    use serde_json::json;
    use shared_bus::{EventFilter, EventTopic, StoreEvent};
    use shared_types::{EntityId, ProjectMessage, ProjectPatch};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::integration::fixtures::{next_event, project, Harness};

    // =========================================================================
    // ASSIGNMENTS
    // =========================================================================

    async fn mount_update(harness: &Harness) {
        Mock::given(method("PATCH"))
            .and(path("/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project": project("p1", "Billing"),
                "messages": [
                    { "email": "dev@corp.io", "projectName": "Billing", "message": "add" },
                    { "email": "old@corp.io", "projectName": "Billing", "message": "remove" },
                    { "email": "odd@corp.io", "projectName": "Billing", "message": "promote" }
                ]
            })))
            .expect(1)
            .mount(&harness.server)
            .await;
    }

    fn update_p1() -> Operation {
        Operation::UpdateProject {
            id: EntityId::from("p1"),
            patch: ProjectPatch {
                name: Some("Billing".into()),
                ..ProjectPatch::default()
            },
        }
    }

    #[tokio::test]
    async fn test_project_update_mails_assignment_changes() {
        let harness = Harness::start().await;
        mount_update(&harness).await;

        let mailer = Arc::new(RecordingMailer::new());
        let notifier = AssignmentNotifier::spawn(&harness.bus, mailer.clone());

        harness.store.run(update_p1()).await.unwrap().unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.projects.messages.len(), 3);
        assert!(state.projects.selected_project.is_none());

        let report = notifier.shutdown().await;
        assert_eq!(
            report,
            NotifyReport {
                sent: 2,
                failed: 0,
                skipped: 1
            }
        );
        assert_eq!(
            mailer.sent(),
            vec![
                Notification::ProjectAssignment {
                    to_email: "dev@corp.io".into(),
                    project_name: "Billing".into(),
                    change: AssignmentChange::Added,
                },
                Notification::ProjectAssignment {
                    to_email: "old@corp.io".into(),
                    project_name: "Billing".into(),
                    change: AssignmentChange::Removed,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_assignment_event_carries_messages() {
        let harness = Harness::start().await;
        mount_update(&harness).await;
        let mut notifications = harness
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Notifications]));

        harness.store.run(update_p1()).await.unwrap().unwrap();

        let Some(StoreEvent::ProjectAssignmentsChanged {
            project_id,
            messages,
        }) = next_event(&mut notifications).await
        else {
            panic!("expected an assignment event");
        };
        assert_eq!(project_id.as_str(), "p1");
        assert_eq!(
            messages[0],
            ProjectMessage {
                email: "dev@corp.io".into(),
                project_name: "Billing".into(),
                message: "add".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_update_without_changes_mails_nothing() {
        let harness = Harness::start().await;
        Mock::given(method("PATCH"))
            .and(path("/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project": project("p1", "Billing"),
                "messages": []
            })))
            .mount(&harness.server)
            .await;

        let mailer = Arc::new(RecordingMailer::new());
        let notifier = AssignmentNotifier::spawn(&harness.bus, mailer.clone());
        harness.store.run(update_p1()).await.unwrap().unwrap();

        assert_eq!(notifier.shutdown().await, NotifyReport::default());
        assert!(mailer.sent().is_empty());
    }

    // =========================================================================
    // PASSWORD RESET
    // =========================================================================

    fn emailjs(server: &MockServer) -> EmailJsMailer {
        EmailJsMailer::new(MailerConfig {
            endpoint: format!("{}/api/v1.0/email/send", server.uri()),
            service_id: "service_x".into(),
            user_id: "public_key".into(),
            password_reset_template: "template_reset".into(),
            assignment_template: "template_assign".into(),
            ..MailerConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_reset_password_mails_new_password() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/reset-password"))
            .and(body_json(json!({ "email": "dev@corp.io" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "newPassword": "Xk29-pq" })))
            .expect(1)
            .mount(&harness.server)
            .await;

        let mail_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/email/send"))
            .and(body_json(json!({
                "service_id": "service_x",
                "template_id": "template_reset",
                "user_id": "public_key",
                "template_params": { "email": "dev@corp.io", "newPassword": "Xk29-pq" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&mail_server)
            .await;

        reset_password(&harness.api, &emailjs(&mail_server), "dev@corp.io")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_without_password_sends_no_mail() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/reset-password"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&harness.server)
            .await;

        let mailer = RecordingMailer::new();
        let err = reset_password(&harness.api, &mailer, "dev@corp.io")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::MissingPassword { ref email } if email == "dev@corp.io"));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reset_password_for_unknown_email_reports_server_message() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/reset-password"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Account not found" })),
            )
            .mount(&harness.server)
            .await;

        let mailer: Arc<dyn NotificationMailer> = Arc::new(RecordingMailer::new());
        let err = reset_password(&harness.api, mailer.as_ref(), "ghost@corp.io")
            .await
            .unwrap_err();

        let ServiceError::Api(api) = err else {
            panic!("expected an API error");
        };
        assert_eq!(api.server_message(), Some("Account not found"));
    }
}
