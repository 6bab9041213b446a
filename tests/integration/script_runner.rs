use crate::common::{funded_node, test_config};
use ledger_e2e::cli::commands::run::run_scripts;
use ledger_e2e::errors::StepError;
use ledger_e2e::node::NodeApi;
use ledger_e2e::scenario::{load_script, parse_script, ScenarioRunner};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const LEASING: &str = "\
Feature: Leasing

  Scenario: Lease to Bob
    Given Alice has 10 lto
    And Alice is not leasing to Bob
    When Alice leases 1.0 lto to Bob
    Then Alice is leasing Bob
    And the transaction is successful

  Scenario: Cancel a lease that does not exist
    Given Carol is not leasing to Dave
    When Carol tries to cancel the lease to Dave
    Then the transaction fails
";

const BROKEN: &str = "\
Feature: Broken

  Scenario: Outcome does not leak between scenarios
    Then the transaction is successful

  Scenario: Unknown step
    Given Alice has 1 lto
    When Alice juggles
    Then Alice has 1 lto
";

#[tokio::test]
async fn test_runner_reports_pass_and_fail() {
    let config = test_config();
    let node: Arc<dyn NodeApi> = Arc::new(funded_node(&config));
    let runner = ScenarioRunner::new(config, node);

    let mut scenarios = parse_script(LEASING, "leasing").unwrap();
    scenarios.extend(parse_script(BROKEN, "broken").unwrap());
    let summary = runner.run(&scenarios).await.unwrap();

    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed(), 2);
    assert!(!summary.is_success());

    let first = &summary.failures[0];
    assert_eq!(first.scenario, "Outcome does not leak between scenarios");
    assert!(matches!(first.error, StepError::Assertion(_)));

    let second = &summary.failures[1];
    assert_eq!(second.line, 8);
    assert_eq!(second.step, "When Alice juggles");
    assert!(matches!(second.error, StepError::Unmatched(_)));
}

#[tokio::test]
async fn test_shipped_lease_feature_passes() {
    let config = test_config();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("features/lease.feature");
    let scenarios = load_script(&path).unwrap();

    let node: Arc<dyn NodeApi> = Arc::new(funded_node(&config));
    let summary = ScenarioRunner::new(config.clone(), node)
        .run(&scenarios)
        .await
        .unwrap();
    assert_eq!(summary.passed, scenarios.len());

    // The cancel scenario funds itself and passes on a fresh node too
    let cancel: Vec<_> = scenarios
        .into_iter()
        .filter(|s| s.name == "Cancel a lease")
        .collect();
    assert_eq!(cancel.len(), 1);
    let node: Arc<dyn NodeApi> = Arc::new(funded_node(&config));
    let summary = ScenarioRunner::new(config, node).run(&cancel).await.unwrap();
    assert!(summary.is_success());
}

#[tokio::test]
async fn test_run_scripts_from_glob() {
    let config = test_config();
    let node: Arc<dyn NodeApi> = Arc::new(funded_node(&config));
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_leasing.feature"), LEASING).unwrap();
    fs::write(dir.path().join("b_broken.feature"), BROKEN).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a script").unwrap();

    let pattern = format!("{}/*.feature", dir.path().display());
    let summary = run_scripts(&pattern, config, node).await.unwrap();

    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed(), 2);
}

#[tokio::test]
async fn test_run_scripts_without_matches() {
    let config = test_config();
    let node: Arc<dyn NodeApi> = Arc::new(funded_node(&config));
    let dir = tempfile::tempdir().unwrap();

    let pattern = format!("{}/*.feature", dir.path().display());
    assert!(run_scripts(&pattern, config, node).await.is_err());
}
