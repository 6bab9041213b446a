use crate::common::{address_of, funded_node, lto, test_config, FakeNode};
use ledger_e2e::config::AppConfig;
use ledger_e2e::errors::{QueryError, StepError, SubmitError};
use ledger_e2e::node::NodeApi;
use ledger_e2e::outcome::Outcome;
use ledger_e2e::scenario::{Keyword, ScenarioWorld};
use std::sync::Arc;

/// "tries to" steps absorb expected failures only; plain steps never do

fn world() -> (AppConfig, Arc<FakeNode>, ScenarioWorld) {
    let config = test_config();
    let node = Arc::new(funded_node(&config));
    let api: Arc<dyn NodeApi> = node.clone();
    let world = ScenarioWorld::new(config.clone(), api).unwrap();
    (config, node, world)
}

#[tokio::test]
async fn test_attempt_absorbs_rejection() {
    let (_, node, mut world) = world();

    world
        .run_step(Keyword::When, "Alice tries to lease 100 lto to Bob")
        .await
        .unwrap();

    assert_eq!(world.outcome(), Outcome::Failure);
    assert_eq!(node.broadcast_count(), 1);
    world
        .run_step(Keyword::Then, "the transaction fails")
        .await
        .unwrap();
    assert!(world
        .run_step(Keyword::Then, "the transaction is successful")
        .await
        .is_err());
}

#[tokio::test]
async fn test_plain_step_propagates_rejection() {
    let (_, _, mut world) = world();

    let result = world
        .run_step(Keyword::When, "Alice leases 100 lto to Bob")
        .await;

    assert!(matches!(
        result,
        Err(StepError::Submit(SubmitError::Rejected(_)))
    ));
    assert_eq!(world.outcome(), Outcome::Failure);
}

#[tokio::test]
async fn test_attempt_to_cancel_missing_lease() {
    let (_, node, mut world) = world();

    world
        .run_step(Keyword::When, "Alice tries to cancel the lease to Bob")
        .await
        .unwrap();

    assert_eq!(world.outcome(), Outcome::Failure);
    assert_eq!(node.broadcast_count(), 0);

    let result = world
        .run_step(Keyword::When, "Alice cancels the lease to Bob")
        .await;
    assert!(matches!(
        result,
        Err(StepError::Submit(SubmitError::Lookup(QueryError::NotFound { .. })))
    ));
}

#[tokio::test]
async fn test_attempt_does_not_absorb_transport_failure() {
    let (_, node, mut world) = world();
    node.fail_reads(true);

    let result = world
        .run_step(Keyword::When, "Alice tries to cancel the lease to Bob")
        .await;

    assert!(matches!(
        result,
        Err(StepError::Submit(SubmitError::Lookup(QueryError::Node(_))))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_attempt_absorbs_confirmation_timeout() {
    let (config, node, mut world) = world();
    node.set_balance(&address_of(&config, "Alice"), lto(10));
    node.stop_confirming();

    world
        .run_step(Keyword::When, "Alice tries to transfer 1 lto to Bob")
        .await
        .unwrap();
    assert_eq!(world.outcome(), Outcome::Failure);

    let result = world
        .run_step(Keyword::When, "Alice transfers 1 lto to Bob")
        .await;
    assert!(matches!(
        result,
        Err(StepError::Submit(SubmitError::ConfirmationTimeout { .. }))
    ));
}

#[tokio::test]
async fn test_attempt_converts_amount() {
    let (config, node, mut world) = world();
    let alice = address_of(&config, "Alice");
    node.set_balance(&alice, lto(3));

    world
        .run_step(Keyword::When, "Alice tries to lease 1.5 lto to Bob")
        .await
        .unwrap();

    assert_eq!(world.outcome(), Outcome::Success);
    let lease = world
        .query()
        .lease_between(&alice, &address_of(&config, "Bob"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lease.amount, 150_000_000);
}

#[tokio::test]
async fn test_unmatched_and_misplaced_steps() {
    let (_, node, mut world) = world();

    assert!(matches!(
        world.run_step(Keyword::When, "Alice tries to dance").await,
        Err(StepError::Unmatched(_))
    ));
    assert!(matches!(
        world.run_step(Keyword::When, "Alice is leasing to Bob").await,
        Err(StepError::WrongKeyword { .. })
    ));
    assert!(matches!(
        world.run_step(Keyword::When, "Alice leases lots lto to Bob").await,
        Err(StepError::InvalidArgument(_))
    ));
    assert_eq!(node.broadcast_count(), 0);
    assert_eq!(world.outcome(), Outcome::Unknown);
}

#[tokio::test]
async fn test_outcome_is_per_world() {
    let (config, node, mut first) = world();
    first
        .run_step(Keyword::When, "Alice tries to sponsor Bob")
        .await
        .unwrap();
    assert_eq!(first.outcome(), Outcome::Failure);

    let api: Arc<dyn NodeApi> = node;
    let second = ScenarioWorld::new(config, api).unwrap();
    assert_eq!(second.outcome(), Outcome::Unknown);
}
