use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::node::{NodeApi, PublicNode};
use crate::scenario::{load_script, RunSummary, ScenarioRunner};
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Run step scripts matching a glob pattern
#[derive(Args)]
pub struct RunCommand {
    /// Glob pattern for script files
    #[arg(default_value = "features/*.feature")]
    pub pattern: String,

    /// Node URL (overrides configuration)
    #[arg(long)]
    pub node_url: Option<String>,
}

impl RunCommand {
    pub async fn run(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(url) = &self.node_url {
            config.node.url = url.clone();
        }

        let node: Arc<dyn NodeApi> = Arc::new(PublicNode::new(&config.node)?);
        let summary = run_scripts(&self.pattern, config, node).await?;

        println!(
            "\n{} scenarios: {} passed, {} failed",
            summary.passed + summary.failed(),
            summary.passed,
            summary.failed()
        );
        for failure in &summary.failures {
            println!(
                "  FAILED {} (line {}: {})\n    {}",
                failure.scenario, failure.line, failure.step, failure.error
            );
        }

        if summary.is_success() {
            Ok(())
        } else {
            Err(AppError::InvalidData(format!(
                "{} scenario(s) failed",
                summary.failed()
            )))
        }
    }
}

/// Run every script matching `pattern`, in path order
pub async fn run_scripts(
    pattern: &str,
    config: AppConfig,
    node: Arc<dyn NodeApi>,
) -> AppResult<RunSummary> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    if paths.is_empty() {
        return Err(AppError::InvalidData(format!(
            "No scripts match '{}'",
            pattern
        )));
    }

    let runner = ScenarioRunner::new(config, node);
    let mut summary = RunSummary::default();
    for path in paths {
        info!("Running {}", path.display());
        let scenarios = load_script(&path)?;
        summary.merge(runner.run(&scenarios).await?);
    }
    Ok(summary)
}
