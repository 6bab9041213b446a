//! Scenario steps over a node
//!
//! [`ScenarioWorld`] carries the per-scenario state and runs one textual
//! step at a time. [`ScenarioRunner`] drives whole scripts.

mod association;
mod funds;
mod lease;
pub mod script;
mod sponsorship;
pub mod vocabulary;
mod world;

pub use script::{
    load_script, parse_script, RunSummary, ScenarioFailure, ScenarioRunner, ScriptScenario,
    ScriptStep,
};
pub use vocabulary::{parse_for, parse_step, Keyword, Step};
pub use world::ScenarioWorld;
