//! # Session Flows
//!
//! 1. **Token expiry**: cleared, redirected and published before the request
//!    completes, then aborted or sent unauthenticated per policy
//! 2. **Headers**: bearer token and `Accept-Language` on every request
//! 3. **Login / logout**: token persisted, remember-me vault, logout clears

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sd_api_client::{
        ExpiredTokenPolicy, KeyValueStore, MemoryStore, RememberMe, VaultConfig,
    };
    use sd_store::{Operation, RequestStatus};
    use serde_json::json;
    use shared_bus::{EventFilter, EventTopic, StoreEvent};
    use shared_types::{Credentials, OperationKind};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use crate::integration::fixtures::{
        next_event, settle_events, skill, token_expiring_at, Harness, NOW,
    };

    // =========================================================================
    // TOKEN EXPIRY
    // =========================================================================

    #[tokio::test]
    async fn test_expired_token_aborts_request_by_default() {
        let harness = Harness::with_token(&token_expiring_at(NOW - 60), ExpiredTokenPolicy::Abort).await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&harness.server)
            .await;

        let mut session = harness.bus.subscribe(EventFilter::topics(vec![EventTopic::Session]));
        let rejection = harness
            .store
            .run(Operation::FetchSkills)
            .await
            .unwrap()
            .unwrap_err();

        assert!(rejection.is_session_expired());
        assert_eq!(harness.storage.get("token").unwrap(), None);
        assert_eq!(harness.redirect.paths(), vec!["/skills".to_string()]);
        assert_eq!(
            next_event(&mut session).await,
            Some(StoreEvent::SessionExpired {
                path: "/skills".into()
            })
        );
        let state = harness.store.snapshot();
        assert_eq!(state.skills.lifecycle.status(), RequestStatus::Failed);
        assert!(!state.auth.is_authenticated);
        assert!(state.auth.token.is_none());
    }

    #[tokio::test]
    async fn test_expired_token_can_send_unauthenticated() {
        let harness = Harness::with_token(
            &token_expiring_at(NOW - 1),
            ExpiredTokenPolicy::SendUnauthenticated,
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([skill("1", "Active")])))
            .expect(1)
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchSkills).await.unwrap().unwrap();

        let requests = harness.server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
        assert_eq!(harness.redirect.count(), 1);
        assert_eq!(harness.storage.get("token").unwrap(), None);
        assert!(!harness.store.snapshot().auth.is_authenticated);
    }

    #[tokio::test]
    async fn test_token_without_exp_counts_as_expired() {
        let token = crate::integration::fixtures::token_with(&json!({ "sub": "admin@corp.io" }));
        let harness = Harness::with_token(&token, ExpiredTokenPolicy::Abort).await;

        let rejection = harness
            .store
            .run(Operation::FetchPositions)
            .await
            .unwrap()
            .unwrap_err();
        assert!(rejection.is_session_expired());
        assert_eq!(harness.redirect.count(), 1);
    }

    #[tokio::test]
    async fn test_clock_moving_past_exp_expires_session() {
        let harness = Harness::with_token(&token_expiring_at(NOW + 30), ExpiredTokenPolicy::Abort).await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchSkills).await.unwrap().unwrap();
        assert_eq!(harness.redirect.count(), 0);

        assert!(harness.store.snapshot().auth.is_authenticated);

        harness.clock.set(NOW + 31);
        let rejection = harness.store.run(Operation::FetchSkills).await.unwrap().unwrap_err();
        assert!(rejection.is_session_expired());
        assert_eq!(harness.redirect.count(), 1);
        assert!(!harness.store.snapshot().auth.is_authenticated);
    }

    // =========================================================================
    // HEADERS
    // =========================================================================

    #[tokio::test]
    async fn test_valid_token_is_sent_as_bearer() {
        let token = token_expiring_at(NOW + 3600);
        let harness = Harness::with_token(&token, ExpiredTokenPolicy::Abort).await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .and(header("accept-language", "Eng"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchAccounts).await.unwrap().unwrap();
        assert!(harness.store.snapshot().auth.is_authenticated);
        assert_eq!(harness.redirect.count(), 0);
    }

    // =========================================================================
    // LOGIN / LOGOUT
    // =========================================================================

    fn credentials() -> Credentials {
        Credentials {
            email: "admin@corp.io".into(),
            password: "hunter2".into(),
        }
    }

    async fn harness_with_vault() -> (Harness, Arc<MemoryStore>) {
        let vault_store = Arc::new(MemoryStore::new());
        let vault = RememberMe::new(
            Arc::clone(&vault_store) as Arc<dyn KeyValueStore>,
            &VaultConfig::default(),
        )
        .unwrap();
        let harness = Harness::build(ExpiredTokenPolicy::Abort, MemoryStore::new(), move |context| {
            context.with_remember_me(vault)
        })
        .await;
        (harness, vault_store)
    }

    #[tokio::test]
    async fn test_login_with_remember_persists_token_and_credentials() {
        let (harness, vault_store) = harness_with_vault().await;
        let token = token_expiring_at(NOW + 3600);
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({ "email": "admin@corp.io", "password": "hunter2" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access_token": token })))
            .expect(1)
            .mount(&harness.server)
            .await;

        harness
            .store
            .run(Operation::Login {
                credentials: credentials(),
                remember: true,
            })
            .await
            .unwrap()
            .unwrap();

        let state = harness.store.snapshot();
        assert!(state.auth.is_authenticated);
        assert_eq!(state.auth.token.as_deref(), Some(token.as_str()));
        assert_eq!(harness.storage.get("token").unwrap().as_deref(), Some(token.as_str()));

        assert_eq!(vault_store.get("email").unwrap().as_deref(), Some("admin@corp.io"));
        let sealed = vault_store.get("password").unwrap().unwrap();
        assert_ne!(sealed, "hunter2");

        let recalled = harness
            .store
            .context()
            .remember_me
            .as_ref()
            .unwrap()
            .recall()
            .unwrap()
            .unwrap();
        assert_eq!(recalled.password, "hunter2");
    }

    #[tokio::test]
    async fn test_login_without_remember_forgets_credentials() {
        let (harness, vault_store) = harness_with_vault().await;
        vault_store.set("email", "old@corp.io").unwrap();
        vault_store.set("password", "stale").unwrap();
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access_token": "t" })))
            .mount(&harness.server)
            .await;

        harness
            .store
            .run(Operation::Login {
                credentials: credentials(),
                remember: false,
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(vault_store.get("email").unwrap(), None);
        assert_eq!(vault_store.get("password").unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_login_reports_server_message() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Wrong password" })),
            )
            .mount(&harness.server)
            .await;

        let rejection = harness
            .store
            .run(Operation::Login {
                credentials: credentials(),
                remember: false,
            })
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(rejection.operation, OperationKind::Login);
        assert_eq!(rejection.message, "Wrong password");
        let state = harness.store.snapshot();
        assert!(!state.auth.is_authenticated);
        assert_eq!(state.auth.lifecycle.error(), Some("Wrong password"));
        assert_eq!(harness.storage.get("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_slice_and_storage() {
        let harness = Harness::with_token(&token_expiring_at(NOW + 3600), ExpiredTokenPolicy::Abort).await;
        assert!(harness.store.snapshot().auth.is_authenticated);

        let mut session = harness.bus.subscribe(EventFilter::topics(vec![EventTopic::Session]));
        harness.store.logout().await.unwrap();

        let state = harness.store.snapshot();
        assert!(!state.auth.is_authenticated);
        assert!(state.auth.token.is_none());
        assert_eq!(harness.storage.get("token").unwrap(), None);
        assert_eq!(settle_events(&mut session).await, vec![StoreEvent::LoggedOut]);
    }

    #[tokio::test]
    async fn test_reset_auth_returns_slice_to_initial_state() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&harness.server)
            .await;

        let _ = harness
            .store
            .run(Operation::Login {
                credentials: credentials(),
                remember: false,
            })
            .await
            .unwrap();
        assert_eq!(
            harness.store.snapshot().auth.lifecycle.status(),
            RequestStatus::Failed
        );

        harness.store.reset_auth().await.unwrap();
        let state = harness.store.snapshot();
        assert_eq!(state.auth.lifecycle.status(), RequestStatus::Idle);
        assert_eq!(state.auth.lifecycle.error(), None);
    }
}
