//! End-to-end rollback scenarios over the workspace fixture.

use mend_tests::prelude::*;

fn workspace() -> Fixture {
    Fixture::load("workspace").unwrap()
}

mod create_and_link {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Create a design, then add it to the project's design list; the list
    /// update fails.
    #[test]
    fn test_failed_link_removes_created_design() {
        // GIVEN
        let fixture = workspace();
        let store = faulty_store(&fixture);
        let project = DocumentRef::new("projects", "proj-1");
        store.fail_on(FaultRule::on(StoreOp::Update).target(project.clone()));
        let session = Session::new(&store, Config::default());

        // WHEN
        let outcome = session
            .run(|b| {
                flows::create_linked(
                    b,
                    "designs",
                    payload_from_fields(fields! { "designName" => "Bedroom", "owner" => "u-1" }),
                    &project,
                    "designs",
                )
                .map(|_| ())
            })
            .unwrap();

        // THEN
        assert!(matches!(outcome, ExecutionOutcome::RolledBack(_)));
        assert_eq!(outcome.severity(), Severity::Recovered);
        assert_missing(store.inner(), &DocumentRef::new("designs", "designs-1"));
        assert_doc(store.inner(), &project, fixture.get(&project).unwrap());
        assert_eq!(store.inner().snapshot(), *fixture.documents());
    }

    #[test]
    fn test_successful_link_records_allocated_id() {
        // GIVEN
        let fixture = workspace();
        let store = fixture.store();
        let project = DocumentRef::new("projects", "proj-1");
        let session = Session::new(&store, Config::default());

        // WHEN
        let report = session
            .commit(|b| {
                flows::create_linked(b, "designs", Payload::new(), &project, "designs").map(|_| ())
            })
            .unwrap();

        // THEN
        let design = report.bindings.get(0).unwrap();
        let designs = store.get(&project).unwrap().unwrap()["designs"].clone();
        assert_eq!(designs, list!["d-1", design.id.as_str()]);
    }
}

mod delete_and_detach {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Delete a comment, then remove its id from the image's comment list;
    /// the list update fails.
    #[test]
    fn test_failed_detach_recreates_comment() {
        // GIVEN
        let fixture = workspace();
        let store = faulty_store(&fixture);
        let comment = DocumentRef::new("comments", "c-1");
        let image = DocumentRef::new("images", "img-1");
        let comment_snapshot = fixture.get(&comment).unwrap().clone();
        let image_snapshot = fixture.get(&image).unwrap().clone();
        store.fail_on(FaultRule::on(StoreOp::Update).target(image.clone()));
        let mut detached = image_snapshot.clone();
        detached.insert("comments".to_string(), list!["c-2"]);
        let plan = TransactionPlan::new(vec![
            new_delete_step(comment.clone(), comment_snapshot.clone()),
            new_update_step(image.clone(), &image_snapshot, fields! { "comments" => list!["c-2"] }),
        ])
        .unwrap();

        // WHEN
        let outcome = TransactionEngine::new(&store).execute(&plan);

        // THEN
        assert!(matches!(outcome, ExecutionOutcome::RolledBack(_)));
        assert_doc(store.inner(), &comment, &comment_snapshot);
        assert_doc(store.inner(), &image, &image_snapshot);
        assert_ne!(store.inner().get(&image).unwrap(), Some(detached));
    }
}

mod partial_rollback {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Steps 0 and 1 commit, step 2 fails, and undoing step 1 fails too.
    #[test]
    fn test_failed_compensation_is_reported_and_others_still_run() {
        // GIVEN
        let fixture = workspace();
        let store = faulty_store(&fixture);
        let design = DocumentRef::new("designs", "d-1");
        let budget = DocumentRef::new("budgets", "b-1");
        let item = DocumentRef::new("items", "i-1");
        let design_before = fixture.get(&design).unwrap().clone();
        let budget_before = fixture.get(&budget).unwrap().clone();
        store
            .fail_on(FaultRule::on(StoreOp::Update).target(budget.clone()).nth(2))
            .fail_on(FaultRule::on(StoreOp::Delete).target(item.clone()));
        let plan = TransactionPlan::new(vec![
            new_update_step(design.clone(), &design_before, fields! { "designName" => "Renamed" }),
            new_update_step(budget.clone(), &budget_before, fields! { "items" => list!["i-2"] }),
            new_delete_step(item.clone(), fixture.get(&item).unwrap().clone()),
        ])
        .unwrap();

        // WHEN
        let outcome = TransactionEngine::new(&store).execute(&plan);

        // THEN
        assert!(matches!(outcome, ExecutionOutcome::PartiallyRolledBack(_)));
        assert_eq!(outcome.failed_compensation_indices(), vec![1]);
        assert_eq!(outcome.severity(), Severity::Inconsistent);
        let report = outcome.rollback_report().unwrap();
        assert_eq!(report.failure.index, 2);
        assert_eq!(report.compensated, vec![1, 0]);
        // step 0 was still undone
        assert_doc(store.inner(), &design, &design_before);
        // step 1's document keeps the forward write
        assert_eq!(
            store.inner().get(&budget).unwrap().unwrap()["items"],
            list!["i-2"]
        );
        assert!(matches!(
            outcome.into_result(),
            Err(TransactionError::CompensationFailed { step: 1, .. })
        ));
    }
}
