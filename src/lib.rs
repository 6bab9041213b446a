//! End-to-end acceptance harness for a ledger node's public HTTP API
//!

pub mod cli;
pub mod config;
pub mod errors;
pub mod identity;
pub mod ledger;
pub mod node;
pub mod outcome;
pub mod poller;
pub mod query;
pub mod scenario;
pub mod submitter;
pub mod utils;
