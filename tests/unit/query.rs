use anyhow::Result;
use crate::common::{address_of, lto, test_config, FakeNode};
use ledger_e2e::errors::QueryError;
use ledger_e2e::node::NodeApi;
use ledger_e2e::query::StateQuery;
use std::sync::Arc;

/// Tests for single-shot state queries

fn query(node: &Arc<FakeNode>) -> StateQuery {
    let api: Arc<dyn NodeApi> = node.clone();
    StateQuery::new(api)
}

#[tokio::test]
async fn test_leasing_lookup() -> Result<()> {
    let config = test_config();
    let alice = address_of(&config, "Alice");
    let bob = address_of(&config, "Bob");
    let carol = address_of(&config, "Carol");
    let node = Arc::new(FakeNode::new());
    let q = query(&node);

    assert!(!q.is_leasing(&alice, &bob).await?);
    assert!(matches!(
        q.lease_id(&alice, &bob).await,
        Err(QueryError::NotFound { relationship: "lease", .. })
    ));

    node.add_lease(&alice, &carol, lto(1));
    let to_bob = node.add_lease(&alice, &bob, lto(2));
    node.add_lease(&bob, &alice, lto(3));

    assert!(q.is_leasing(&alice, &bob).await?);
    assert_eq!(q.lease_id(&alice, &bob).await?, to_bob);
    assert_eq!(q.leases_to(&alice, &carol).await?.len(), 1);
    assert!(!q.is_leasing(&bob, &carol).await?);
    Ok(())
}

#[tokio::test]
async fn test_read_failure_is_not_absence() {
    let config = test_config();
    let alice = address_of(&config, "Alice");
    let bob = address_of(&config, "Bob");
    let node = Arc::new(FakeNode::new());
    node.fail_reads(true);
    let q = query(&node);

    assert!(matches!(
        q.is_leasing(&alice, &bob).await,
        Err(QueryError::Node(_))
    ));
    assert!(matches!(
        q.is_sponsoring(&alice, &bob).await,
        Err(QueryError::Node(_))
    ));
    assert!(q.balance(&alice).await.is_err());
}

#[tokio::test]
async fn test_balance_and_empty_relationships() -> Result<()> {
    let config = test_config();
    let alice = address_of(&config, "Alice");
    let bob = address_of(&config, "Bob");
    let node = Arc::new(FakeNode::new());
    node.set_balance(&alice, lto(7));
    let q = query(&node);

    assert_eq!(q.balance(&alice).await?, lto(7));
    assert_eq!(q.balance(&bob).await?, 0);
    assert!(!q.is_sponsoring(&alice, &bob).await?);
    assert!(q.associations(&alice, &bob, None).await?.is_empty());
    Ok(())
}
