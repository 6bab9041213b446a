//! Ledger node integration module
//!
//! This module provides node access for scenarios:
//! - **Api** - the [`NodeApi`] trait and response types
//! - **Client** - [`PublicNode`], a reqwest implementation of the public HTTP API

pub mod api;
pub mod client;

// Re-export main types
pub use api::{
    is_confirmed, AssociationEntry, AssociationStatus, BroadcastReceipt, LeaseEntry, NodeApi,
    SponsorshipList,
};
pub use client::PublicNode;
