//! Unit Tests Module
//!
//! Component tests against the in-memory node. No live node required.

pub mod query;
