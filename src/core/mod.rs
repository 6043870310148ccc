//! Core business logic - framework-agnostic stores, reconciliation, and
//! derived-view computation. Nothing in here knows about screens or widgets;
//! everything is driven through explicit state objects and pure functions.

/// Wallet balances and the app-wide masking toggle
pub mod balance;
/// Generic collection state with pure change-message dispatch
pub mod collection;
/// The notifications feed store with optimistic mark-as-read
pub mod events;
/// Currency, date, and progress formatting
pub mod format;
/// RPC-then-read store for metrics, trends, and vault performance
pub mod insights;
/// Payout plan store and home-screen aggregates
pub mod payouts;
/// Session lifecycle and the per-user store bundle
pub mod session;
/// Calendar grouping and type filtering over events
pub mod timeline;
