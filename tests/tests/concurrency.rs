//! Independent plans running on several threads over one store.

use std::thread;

use mend_tests::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_independent_plans_commit_concurrently() {
    // GIVEN - each thread owns one user and links new designs to it
    let store = MemoryStore::new();
    let users: Vec<DocumentRef> = (0..8)
        .map(|i| DocumentRef::new("users", format!("u-{i}")))
        .collect();
    for user in &users {
        store.seed(user.clone(), fields! { "designs" => list![] });
    }

    // WHEN
    thread::scope(|scope| {
        for user in &users {
            let store = &store;
            scope.spawn(move || {
                let session = Session::new(store, Config::default());
                for _ in 0..4 {
                    let outcome = session
                        .run(|b| {
                            flows::create_linked(b, "designs", Payload::new(), user, "designs")
                                .map(|_| ())
                        })
                        .unwrap();
                    assert!(outcome.is_committed());
                }
            });
        }
    });

    // THEN - every allocated id is distinct and linked exactly once
    assert_eq!(store.collection("designs").len(), 32);
    let mut linked: Vec<String> = users
        .iter()
        .flat_map(|user| {
            store.get(user).unwrap().unwrap()["designs"]
                .as_list()
                .unwrap()
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .collect();
    linked.sort();
    linked.dedup();
    assert_eq!(linked.len(), 32);
}

#[test]
fn test_rollback_on_one_thread_leaves_others_committed() {
    // GIVEN
    let store = FaultyStore::new(MemoryStore::new());
    let ok_user = DocumentRef::new("users", "u-ok");
    let bad_user = DocumentRef::new("users", "u-bad");
    store.inner().seed(ok_user.clone(), fields! { "designs" => list![] });
    store.inner().seed(bad_user.clone(), fields! { "designs" => list![] });
    store.fail_on(FaultRule::on(StoreOp::Update).target(bad_user.clone()).always());

    let run = |user: &DocumentRef| {
        Session::new(&store, Config::default())
            .run(|b| {
                flows::create_linked(b, "designs", Payload::new(), user, "designs").map(|_| ())
            })
            .unwrap()
    };

    // WHEN
    let (ok, bad) = thread::scope(|scope| {
        let ok = scope.spawn(|| run(&ok_user));
        let bad = scope.spawn(|| run(&bad_user));
        (ok.join().unwrap(), bad.join().unwrap())
    });

    // THEN
    assert!(ok.is_committed());
    assert!(matches!(bad, ExecutionOutcome::RolledBack(_)));
    assert_eq!(store.inner().collection("designs").len(), 1);
    assert_eq!(
        store.inner().get(&bad_user).unwrap(),
        Some(fields! { "designs" => list![] })
    );
}
