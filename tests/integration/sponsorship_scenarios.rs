use crate::common::{address_of, funded_node, lto, test_config};
use ledger_e2e::errors::StepError;
use ledger_e2e::node::NodeApi;
use ledger_e2e::scenario::{Keyword, ScenarioWorld};
use std::sync::Arc;

#[tokio::test]
async fn test_sponsor_and_cancel() {
    let config = test_config();
    let node = Arc::new(funded_node(&config));
    let api: Arc<dyn NodeApi> = node.clone();
    let mut world = ScenarioWorld::new(config.clone(), api).unwrap();

    world.run_step(Keyword::Given, "Alice has 20 lto").await.unwrap();
    world
        .run_step(Keyword::Given, "Alice is not sponsoring Bob")
        .await
        .unwrap();
    world.run_step(Keyword::When, "Alice sponsors Bob").await.unwrap();
    world
        .run_step(Keyword::Then, "Alice is sponsoring Bob")
        .await
        .unwrap();
    world
        .run_step(Keyword::Then, "Bob is not sponsoring Alice")
        .await
        .unwrap();

    world
        .run_step(Keyword::When, "Alice cancels the sponsorship for Bob")
        .await
        .unwrap();
    world
        .run_step(Keyword::Then, "Alice is not sponsoring Bob")
        .await
        .unwrap();

    let alice = address_of(&config, "Alice");
    assert_eq!(
        node.balance_of(&alice),
        lto(20) - config.fees.sponsorship - config.fees.cancel_sponsorship
    );
}

#[tokio::test]
async fn test_given_sponsoring_acts_once() {
    let config = test_config();
    let node = Arc::new(funded_node(&config));
    let api: Arc<dyn NodeApi> = node.clone();
    let mut world = ScenarioWorld::new(config, api).unwrap();

    world
        .run_step(Keyword::Given, "Alice is sponsoring Bob")
        .await
        .unwrap();
    let after_first = node.broadcast_count();
    world
        .run_step(Keyword::Given, "Alice is sponsoring Bob")
        .await
        .unwrap();

    assert_eq!(after_first, 2);
    assert_eq!(node.broadcast_count(), after_first);

    let result = world
        .run_step(Keyword::Then, "Alice is not sponsoring Bob")
        .await;
    assert!(matches!(result, Err(StepError::Assertion(_))));
}

#[tokio::test]
async fn test_given_not_sponsoring_acts_only_when_needed() {
    let config = test_config();
    let node = Arc::new(funded_node(&config));
    let api: Arc<dyn NodeApi> = node.clone();
    let mut world = ScenarioWorld::new(config.clone(), api).unwrap();

    world
        .run_step(Keyword::Given, "Alice is not sponsoring Bob")
        .await
        .unwrap();

    assert_eq!(node.broadcast_count(), 0);
    assert_eq!(node.balance_of(&address_of(&config, "Alice")), 0);
}
