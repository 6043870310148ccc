//! Backend collaborator - the hosted data platform the client consumes.
//!
//! The client never implements delivery, ordering, or consistency itself; it
//! fetches user-scoped collections, issues the two mark-read writes, calls the
//! insights refresh RPC, and subscribes to row-level change notifications.

/// Connected/mock backend client with per-collection reads and writes
pub mod client;

/// Typed change messages and the broadcast-based realtime feed
pub mod feed;

pub use client::{
    BackendClient, EventRecord, RelatedBankAccount, RelatedPlan, RelatedTransaction,
    VaultPerformanceRecord,
};
pub use feed::{ChangeFeed, ChangeKind, ChangeMessage, Drained, Subscription, Table};
