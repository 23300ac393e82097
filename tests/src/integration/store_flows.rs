//! # Store Flows
//!
//! Dispatch through the store task against a mock backend:
//!
//! 1. **Lifecycle**: pending before dispatch returns, then succeeded/failed
//! 2. **Merges**: update by id, delete of a missing id, failed writes
//! 3. **Staleness guard**: superseded reads discarded, late writes applied,
//!    parallel reads of different fields both kept

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use sd_store::{Operation, RequestStatus};
    use shared_bus::StoreEvent;
    use shared_types::{EntityId, OperationKind, Patch, SkillPatch};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use crate::integration::fixtures::{next_event, project, settle_events, skill, Harness};

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_fetch_is_loading_until_response_arrives() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([skill("1", "Active")]))
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&harness.server)
            .await;

        let dispatched = harness.store.dispatch(Operation::FetchSkills).await.unwrap();
        assert_eq!(
            harness.store.snapshot().skills.lifecycle.status(),
            RequestStatus::Loading
        );

        dispatched.settled().await.unwrap();
        let state = harness.store.snapshot();
        assert_eq!(state.skills.lifecycle.status(), RequestStatus::Succeeded);
        assert_eq!(state.skills.skills.len(), 1);
    }

    #[tokio::test]
    async fn test_every_slice_reports_loading_then_settles() {
        let harness = Harness::start().await;
        for route in ["/accounts", "/employees", "/positions", "/skills", "/projects"] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(&harness.server)
                .await;
        }

        let operations = [
            Operation::FetchAccounts,
            Operation::FetchEmployees,
            Operation::FetchPositions,
            Operation::FetchSkills,
            Operation::FetchProjects,
        ];
        for operation in operations {
            let kind = operation.kind();
            let dispatched = harness.store.dispatch(operation).await.unwrap();
            assert_ne!(
                harness.store.snapshot().lifecycle(kind).status(),
                RequestStatus::Idle,
                "{kind:?} still idle after dispatch"
            );
            dispatched.settled().await.unwrap();
            assert_eq!(
                harness.store.snapshot().lifecycle(kind).status(),
                RequestStatus::Succeeded
            );
        }
    }

    // =========================================================================
    // MERGES
    // =========================================================================

    #[tokio::test]
    async fn test_update_replaces_record_by_id() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([skill("1", "Active")])))
            .mount(&harness.server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/skills/1"))
            .and(body_json(json!({ "status": "Inactive" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(skill("1", "Inactive")))
            .expect(1)
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchSkills).await.unwrap().unwrap();
        let patch = SkillPatch::from_json_non_empty(r#"{"status":"Inactive"}"#).unwrap();
        harness
            .store
            .run(Operation::UpdateSkill {
                id: EntityId::from("1"),
                patch,
            })
            .await
            .unwrap()
            .unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.skills.skills.len(), 1);
        assert_eq!(state.skills.skills[0].id.as_str(), "1");
        assert_eq!(state.skills.skills[0].status, "Inactive");
    }

    #[tokio::test]
    async fn test_delete_of_missing_record_resolves_without_change() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/positions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "_id": "1", "name": "Tester", "status": "Active" }
            ])))
            .mount(&harness.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/positions/2"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchPositions).await.unwrap().unwrap();
        let before = harness.store.snapshot().positions.positions.clone();

        let result = harness
            .store
            .run(Operation::DeletePosition(EntityId::from("2")))
            .await
            .unwrap();
        assert!(result.is_ok());

        let state = harness.store.snapshot();
        assert_eq!(state.positions.positions, before);
        assert_eq!(state.positions.lifecycle.status(), RequestStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_items_and_records_message() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([skill("1", "Active")])))
            .mount(&harness.server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/skills/1"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "message": "Skill name already in use", "statusCode": 409 })),
            )
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchSkills).await.unwrap().unwrap();
        let before = harness.store.snapshot().skills.skills.clone();

        let rejection = harness
            .store
            .run(Operation::UpdateSkill {
                id: EntityId::from("1"),
                patch: SkillPatch::from_json(r#"{"name":"Go"}"#).unwrap(),
            })
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(rejection.message, "Skill name already in use");
        assert_eq!(rejection.status, Some(409));
        let state = harness.store.snapshot();
        assert_eq!(state.skills.skills, before);
        assert_eq!(state.skills.lifecycle.status(), RequestStatus::Failed);
        assert_eq!(state.skills.lifecycle.error(), Some("Skill name already in use"));
    }

    #[tokio::test]
    async fn test_add_without_server_message_uses_fallback() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/employees/create"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&harness.server)
            .await;

        let rejection = harness
            .store
            .run(Operation::AddEmployee(Default::default()))
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(rejection.message, "Failed to add employee");
        assert_eq!(
            harness.store.snapshot().employees.lifecycle.error(),
            Some("Failed to add employee")
        );
    }

    #[tokio::test]
    async fn test_soft_delete_then_restore_keeps_project() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                project("p1", "Billing"),
                project("p2", "Payroll")
            ])))
            .mount(&harness.server)
            .await;
        let mut deleted = project("p1", "Billing");
        deleted["isDeleted"] = json!(true);
        Mock::given(method("PATCH"))
            .and(path("/projects/p1/delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(deleted))
            .mount(&harness.server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/projects/p1/restore"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project("p1", "Billing")))
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchProjects).await.unwrap().unwrap();
        harness
            .store
            .run(Operation::DeleteProject(EntityId::from("p1")))
            .await
            .unwrap()
            .unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.projects.projects.len(), 2);
        assert_eq!(state.projects.active().count(), 1);

        harness
            .store
            .run(Operation::RestoreProject(EntityId::from("p1")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(harness.store.snapshot().projects.active().count(), 2);
    }

    #[tokio::test]
    async fn test_member_role_updates_selected_and_list() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([project("p1", "Billing")])))
            .mount(&harness.server)
            .await;
        let mut updated = project("p1", "Billing");
        updated["employees"] = json!([{ "accountId": "acc-2", "role": "Lead" }]);
        Mock::given(method("PATCH"))
            .and(path("/projects/p1/employee/role"))
            .and(body_json(json!({ "accountId": "acc-2", "role": "Lead" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .mount(&harness.server)
            .await;

        harness.store.run(Operation::FetchProjects).await.unwrap().unwrap();
        harness
            .store
            .run(Operation::UpdateMemberRole {
                project: EntityId::from("p1"),
                assignment: shared_types::RoleAssignment {
                    account_id: EntityId::from("acc-2"),
                    role: "Lead".into(),
                },
            })
            .await
            .unwrap()
            .unwrap();

        let state = harness.store.snapshot();
        let selected = state.projects.selected_project.as_ref().unwrap();
        assert_eq!(selected.employees[0].role, "Lead");
        assert_eq!(state.projects.projects[0].employees.len(), 1);
    }

    #[tokio::test]
    async fn test_profile_employee_update_needs_loaded_account() {
        let harness = Harness::start().await;
        Mock::given(method("PATCH"))
            .and(path("/employees/update/e1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "_id": "e1", "name": "Lan" })),
            )
            .mount(&harness.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts/account"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "_id": "acc-1", "employeeId": "e1" })),
            )
            .mount(&harness.server)
            .await;

        let update = || Operation::UpdateProfileEmployee {
            id: EntityId::from("e1"),
            patch: shared_types::EmployeePatch::from_json(r#"{"name":"Lan"}"#).unwrap(),
        };

        harness.store.run(update()).await.unwrap().unwrap();
        assert!(harness.store.snapshot().profile.account.is_none());

        harness
            .store
            .run(Operation::FetchProfile(EntityId::from("acc-1")))
            .await
            .unwrap()
            .unwrap();
        harness.store.run(update()).await.unwrap().unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.profile.employee().map(|e| e.name.as_str()), Some("Lan"));
    }

    // =========================================================================
    // STALENESS GUARD
    // =========================================================================

    #[tokio::test]
    async fn test_superseded_list_fetch_is_discarded() {
        let harness = Harness::start().await;
        // First request is slow and returns stale data; the second is fast.
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([skill("old", "Active")]))
                    .set_delay(Duration::from_millis(300)),
            )
            .up_to_n_times(1)
            .mount(&harness.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([skill("new", "Active")])))
            .mount(&harness.server)
            .await;

        let mut events = harness.subscribe_all();
        let first = harness.store.dispatch(Operation::FetchSkills).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = harness.store.dispatch(Operation::FetchSkills).await.unwrap();

        second.settled().await.unwrap();
        let first_seq = first.seq();
        // The slow response still resolves for its caller.
        first.settled().await.unwrap();

        let state = harness.store.snapshot();
        let ids: Vec<_> = state.skills.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["new"]);
        assert_eq!(state.skills.lifecycle.status(), RequestStatus::Succeeded);

        let discarded = settle_events(&mut events)
            .await
            .into_iter()
            .find(|e| matches!(e, StoreEvent::StaleResponseDiscarded { .. }));
        assert!(matches!(
            discarded,
            Some(StoreEvent::StaleResponseDiscarded { seq, operation: OperationKind::FetchSkills, .. })
                if seq == first_seq
        ));
    }

    #[tokio::test]
    async fn test_late_write_applies_but_leaves_status_to_newer_read() {
        let harness = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/skills/create"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(skill("9", "Active"))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&harness.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(600)),
            )
            .mount(&harness.server)
            .await;

        let add = harness
            .store
            .dispatch(Operation::AddSkill(SkillPatch::from_json(r#"{"name":"Zig"}"#).unwrap()))
            .await
            .unwrap();
        let fetch = harness.store.dispatch(Operation::FetchSkills).await.unwrap();

        add.settled().await.unwrap();
        let state = harness.store.snapshot();
        assert_eq!(state.skills.skills.len(), 1);
        assert_eq!(state.skills.lifecycle.status(), RequestStatus::Loading);

        fetch.settled().await.unwrap();
        assert_eq!(
            harness.store.snapshot().skills.lifecycle.status(),
            RequestStatus::Succeeded
        );
    }

    #[tokio::test]
    async fn test_parallel_reads_of_one_slice_fill_both_fields() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/employees"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "_id": "e1", "name": "Lan" }]))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&harness.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/positions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "pos-1", "name": "QA" }])))
            .mount(&harness.server)
            .await;

        let mut events = harness.subscribe_all();
        let employees = harness.store.dispatch(Operation::FetchEmployees).await.unwrap();
        let positions = harness
            .store
            .dispatch(Operation::FetchEmployeePositions)
            .await
            .unwrap();
        positions.settled().await.unwrap();
        employees.settled().await.unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.employees.employees.len(), 1);
        assert_eq!(state.employees.positions.len(), 1);
        assert_eq!(state.employees.lifecycle.status(), RequestStatus::Succeeded);
        assert!(!settle_events(&mut events)
            .await
            .iter()
            .any(|e| matches!(e, StoreEvent::StaleResponseDiscarded { .. })));
    }

    #[tokio::test]
    async fn test_accounts_and_unassigned_employees_load_together() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "_id": "acc-1", "email": "admin@corp.io" }]))
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&harness.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/employees/without-accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "e9" }])))
            .mount(&harness.server)
            .await;

        let accounts = harness.store.dispatch(Operation::FetchAccounts).await.unwrap();
        let unassigned = harness
            .store
            .dispatch(Operation::FetchEmployeesWithoutAccount)
            .await
            .unwrap();
        unassigned.settled().await.unwrap();
        accounts.settled().await.unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.accounts.accounts.len(), 1);
        assert_eq!(state.accounts.employees_without_account.len(), 1);
    }

    #[tokio::test]
    async fn test_write_dispatched_after_fetch_does_not_discard_it() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/skills"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([skill("a", "Active"), skill("b", "Active"), skill("c", "Active")]))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&harness.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/skills/create"))
            .respond_with(ResponseTemplate::new(201).set_body_json(skill("new", "Active")))
            .mount(&harness.server)
            .await;

        let fetch = harness.store.dispatch(Operation::FetchSkills).await.unwrap();
        let add = harness
            .store
            .dispatch(Operation::AddSkill(SkillPatch::from_json(r#"{"name":"Zig"}"#).unwrap()))
            .await
            .unwrap();
        add.settled().await.unwrap();
        fetch.settled().await.unwrap();

        let state = harness.store.snapshot();
        let ids: Vec<_> = state.skills.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(state.skills.lifecycle.status(), RequestStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_detail_fetch_does_not_touch_list_status() {
        let harness = Harness::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project("p1", "Billing")))
            .mount(&harness.server)
            .await;

        let mut events = harness.subscribe_all();
        harness
            .store
            .run(Operation::FetchProject(EntityId::from("p1")))
            .await
            .unwrap()
            .unwrap();

        let state = harness.store.snapshot();
        assert_eq!(state.projects.detail.status(), RequestStatus::Succeeded);
        assert_eq!(state.projects.lifecycle.status(), RequestStatus::Idle);
        assert!(matches!(
            next_event(&mut events).await,
            Some(StoreEvent::OperationStarted { operation: OperationKind::FetchProject, .. })
        ));
    }

    #[tokio::test]
    async fn test_secondary_fetches_fill_their_own_fields() {
        let harness = Harness::start().await;
        let routes = [
            ("/employees/without-accounts", json!([{ "_id": "e9", "name": "New Hire" }])),
            ("/projects/p1/employees", json!([{ "_id": "acc-2", "email": "dev@corp.io" }])),
            ("/projects/by-account/acc-2", json!([project("p1", "Billing")])),
            ("/skills", json!([skill("1", "Active"), skill("2", "Active")])),
        ];
        for (route, body) in routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&harness.server)
                .await;
        }

        for operation in [
            Operation::FetchEmployeesWithoutAccount,
            Operation::FetchProjectEmployees(EntityId::from("p1")),
            Operation::FetchProjectsByAccount(EntityId::from("acc-2")),
            Operation::FetchProfileSkills,
        ] {
            harness.store.run(operation).await.unwrap().unwrap();
        }

        let state = harness.store.snapshot();
        assert!(state.accounts.accounts.is_empty());
        assert_eq!(state.accounts.employees_without_account[0].name, "New Hire");
        assert_eq!(state.projects.project_employees[0].email, "dev@corp.io");
        assert_eq!(state.projects.projects.len(), 1);
        assert!(state.skills.skills.is_empty());
        assert_eq!(state.profile.skills.as_ref().map(Vec::len), Some(2));
        assert_eq!(state.profile.lifecycle.status(), RequestStatus::Succeeded);
    }
}
