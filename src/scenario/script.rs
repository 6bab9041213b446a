//! Step scripts
//!
//! A script is plain text in the familiar Feature / Scenario layout:
//!
//! ```text
//! Feature: Leasing
//!
//!   Scenario: Alice leases to Bob
//!     Given Alice is not leasing to Bob
//!     When Alice leases 1.0 lto to Bob
//!     Then Alice is leasing Bob
//!     And the transaction is successful
//! ```
//!
//! `And` / `But` inherit the previous keyword, `#` starts a comment and
//! steps before the first `Scenario:` form a scenario named after the
//! feature. Scenarios run one after another, each in a fresh
//! [`ScenarioWorld`]; the first failing step ends its scenario.

use super::vocabulary::Keyword;
use super::world::ScenarioWorld;
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult, StepError};
use crate::node::NodeApi;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// One step line of a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub keyword: Keyword,
    pub text: String,
    pub line: usize,
}

/// A named list of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptScenario {
    pub name: String,
    pub steps: Vec<ScriptStep>,
}

/// Split script text into scenarios
pub fn parse_script(source: &str, default_name: &str) -> AppResult<Vec<ScriptScenario>> {
    let mut scenarios: Vec<ScriptScenario> = Vec::new();
    let mut feature = default_name.to_string();
    let mut previous: Option<Keyword> = None;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix("Feature:") {
            feature = name.trim().to_string();
            continue;
        }
        if let Some(name) = line.strip_prefix("Scenario:") {
            scenarios.push(ScriptScenario {
                name: name.trim().to_string(),
                steps: Vec::new(),
            });
            previous = None;
            continue;
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let keyword = match word {
            "And" | "But" => previous.ok_or_else(|| {
                AppError::InvalidData(format!("line {}: '{}' without a preceding step", line_no, word))
            })?,
            other => Keyword::parse(other).ok_or_else(|| {
                AppError::InvalidData(format!("line {}: unexpected '{}'", line_no, line))
            })?,
        };
        previous = Some(keyword);

        if scenarios.is_empty() {
            scenarios.push(ScriptScenario {
                name: feature.clone(),
                steps: Vec::new(),
            });
        }
        if let Some(current) = scenarios.last_mut() {
            current.steps.push(ScriptStep {
                keyword,
                text: rest.trim().to_string(),
                line: line_no,
            });
        }
    }

    Ok(scenarios)
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> AppResult<Vec<ScriptScenario>> {
    let source = std::fs::read_to_string(path)?;
    let default_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scenario".to_string());
    parse_script(&source, &default_name)
}

/// A scenario that did not pass
#[derive(Debug)]
pub struct ScenarioFailure {
    pub scenario: String,
    pub step: String,
    pub line: usize,
    pub error: StepError,
}

/// Totals for a run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub failures: Vec<ScenarioFailure>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.passed += other.passed;
        self.failures.extend(other.failures);
    }
}

/// Runs scenarios against one node, a fresh world per scenario
pub struct ScenarioRunner {
    config: AppConfig,
    node: Arc<dyn NodeApi>,
}

impl ScenarioRunner {
    pub fn new(config: AppConfig, node: Arc<dyn NodeApi>) -> Self {
        Self { config, node }
    }

    pub async fn run(&self, scenarios: &[ScriptScenario]) -> AppResult<RunSummary> {
        let mut summary = RunSummary::default();

        for scenario in scenarios {
            let mut world = ScenarioWorld::new(self.config.clone(), Arc::clone(&self.node))?;
            match run_scenario(&mut world, scenario).await {
                Ok(()) => {
                    info!("PASS {}", scenario.name);
                    summary.passed += 1;
                }
                Err(failure) => {
                    error!(
                        "FAIL {} (line {}: {}): {}",
                        failure.scenario, failure.line, failure.step, failure.error
                    );
                    summary.failures.push(failure);
                }
            }
        }

        Ok(summary)
    }
}

async fn run_scenario(
    world: &mut ScenarioWorld,
    scenario: &ScriptScenario,
) -> Result<(), ScenarioFailure> {
    for step in &scenario.steps {
        if let Err(error) = world.run_step(step.keyword, &step.text).await {
            return Err(ScenarioFailure {
                scenario: scenario.name.clone(),
                step: format!("{} {}", step.keyword, step.text),
                line: step.line,
                error,
            });
        }
    }
    Ok(())
}
