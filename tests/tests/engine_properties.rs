//! Engine properties over randomly generated plans.
//!
//! Plans mix creates, updates and deletes over distinct documents of the
//! workspace fixture, so every step's writes can be told apart in the log.

use mend_tests::prelude::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const ROUNDS: u64 = 48;

struct Generated {
    plan: TransactionPlan,
    targets: Vec<DocumentRef>,
}

fn generate(rng: &mut StdRng, fixture: &Fixture) -> Generated {
    let mut pool: Vec<DocumentRef> = fixture.documents().keys().cloned().collect();
    pool.shuffle(rng);
    let len = rng.gen_range(2..=6);
    let mut steps = Vec::with_capacity(len);
    let mut targets = Vec::with_capacity(len);

    for i in 0..len {
        let step = match rng.gen_range(0..3) {
            0 => {
                let doc = DocumentRef::new("scratch", format!("s-{i}"));
                targets.push(doc.clone());
                new_create_step(doc, fields! { "seq" => i as i64 })
            }
            kind => {
                let Some(doc) = pool.pop() else { break };
                targets.push(doc.clone());
                let prior = fixture.get(&doc).cloned().unwrap_or_default();
                if kind == 1 {
                    new_update_step(doc, &prior, fields! { "touched" => true, "seq" => i as i64 })
                } else {
                    new_delete_step(doc, prior)
                }
            }
        };
        steps.push(step);
    }

    Generated {
        plan: TransactionPlan::new(steps).unwrap(),
        targets,
    }
}

fn forward_op(kind: StepKind) -> StoreOp {
    match kind {
        StepKind::Create => StoreOp::Create,
        StepKind::Update => StoreOp::Update,
        StepKind::Delete => StoreOp::Delete,
    }
}

/// The compensating op and which occurrence of it on the target it is.
fn compensation_op(kind: StepKind) -> (StoreOp, usize) {
    match kind {
        StepKind::Create => (StoreOp::Delete, 1),
        StepKind::Update => (StoreOp::Update, 2),
        StepKind::Delete => (StoreOp::Set, 1),
    }
}

#[test]
fn test_all_writes_succeeding_commits_everything() {
    let fixture = Fixture::load("workspace").unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..ROUNDS {
        // GIVEN
        let generated = generate(&mut rng, &fixture);
        let store = faulty_store(&fixture);

        // WHEN
        let outcome = TransactionEngine::new(&store).execute(&generated.plan);

        // THEN
        assert!(outcome.is_committed());
        let written: Vec<_> = store.writes().into_iter().map(|w| w.target).collect();
        let expected: Vec<_> = generated.targets.iter().cloned().map(Some).collect();
        assert_eq!(written, expected);
        for (step, doc) in generated.plan.steps().iter().zip(&generated.targets) {
            match step.kind {
                StepKind::Delete => assert_missing(store.inner(), doc),
                _ => assert!(store.inner().get(doc).unwrap().is_some()),
            }
        }
    }
}

#[test]
fn test_any_failing_step_restores_prior_state() {
    let fixture = Fixture::load("workspace").unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..ROUNDS {
        // GIVEN
        let generated = generate(&mut rng, &fixture);
        let k = rng.gen_range(0..generated.plan.len());
        let failing = &generated.targets[k];
        let store = faulty_store(&fixture);
        store.fail_on(
            FaultRule::on(forward_op(generated.plan.steps()[k].kind)).target(failing.clone()),
        );

        // WHEN
        let outcome = TransactionEngine::new(&store).execute(&generated.plan);

        // THEN
        assert!(matches!(outcome, ExecutionOutcome::RolledBack(_)));
        assert_eq!(outcome.forward_failure().map(|f| f.index), Some(k));
        assert_eq!(store.inner().snapshot(), *fixture.documents());
        let on_failing: Vec<_> = store
            .writes()
            .into_iter()
            .filter(|w| w.target.as_ref() == Some(failing))
            .collect();
        assert_eq!(on_failing.len(), 1);
        assert!(on_failing[0].failed);
    }
}

#[test]
fn test_compensations_run_in_reverse_step_order() {
    let fixture = Fixture::load("workspace").unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..ROUNDS {
        // GIVEN
        let generated = generate(&mut rng, &fixture);
        let k = generated.plan.len() - 1;
        let store = faulty_store(&fixture);
        store.fail_on(
            FaultRule::on(forward_op(generated.plan.steps()[k].kind))
                .target(generated.targets[k].clone()),
        );

        // WHEN
        let outcome = TransactionEngine::new(&store).execute(&generated.plan);

        // THEN
        let undo: Vec<_> = store
            .writes()
            .into_iter()
            .skip(k + 1)
            .map(|w| w.target)
            .collect();
        let expected: Vec<_> = generated.targets[..k].iter().rev().cloned().map(Some).collect();
        assert_eq!(undo, expected);
        let expected_indices: Vec<usize> = (0..k).rev().collect();
        assert_eq!(outcome.rollback_report().unwrap().compensated, expected_indices);
    }
}

#[test]
fn test_failed_compensation_does_not_skip_the_rest() {
    let fixture = Fixture::load("workspace").unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let mut checked = 0;

    while checked < ROUNDS {
        // GIVEN - step k fails forward, step j < k fails to compensate
        let generated = generate(&mut rng, &fixture);
        let k = generated.plan.len() - 1;
        if k == 0 {
            continue;
        }
        checked += 1;
        let j = rng.gen_range(0..k);
        let store = faulty_store(&fixture);
        let (op, nth) = compensation_op(generated.plan.steps()[j].kind);
        store
            .fail_on(
                FaultRule::on(forward_op(generated.plan.steps()[k].kind))
                    .target(generated.targets[k].clone()),
            )
            .fail_on(FaultRule::on(op).target(generated.targets[j].clone()).nth(nth));

        // WHEN
        let outcome = TransactionEngine::new(&store).execute(&generated.plan);

        // THEN
        assert!(matches!(outcome, ExecutionOutcome::PartiallyRolledBack(_)));
        assert_eq!(outcome.failed_compensation_indices(), vec![j]);
        assert_eq!(
            outcome.rollback_report().unwrap().compensated,
            (0..k).rev().collect::<Vec<_>>()
        );
        let before = fixture.documents();
        let others = generated
            .targets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != j)
            .map(|(_, doc)| doc);
        assert_restored(store.inner(), before, others);
    }
}
