//! Realtime change feed.
//!
//! The hosted backend pushes row-level change notifications for subscribed
//! tables. Locally that stream is a broadcast channel of [`ChangeMessage`]
//! values; a [`Subscription`] filters by table and owning user, mirroring the
//! server-side `user_id` equality filter. Messages arrive in backend commit
//! order per row id; nothing here reorders or deduplicates.

use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Tables a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Notification events
    Events,
    /// Payout plans
    PayoutPlans,
    /// Deposits and payouts
    Transactions,
    /// Wallet balances
    Wallets,
    /// Daily insight metrics
    UserMetrics,
    /// Period-over-period trends
    PerformanceTrends,
    /// Per-plan performance rows
    VaultPerformance,
}

impl Table {
    /// Wire name of the table, matching the backend schema.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::PayoutPlans => "payout_plans",
            Self::Transactions => "transactions",
            Self::Wallets => "wallets",
            Self::UserMetrics => "user_metrics",
            Self::PerformanceTrends => "performance_trends",
            Self::VaultPerformance => "vault_performance",
        }
    }
}

/// Kind of row-level change a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A new row appeared
    Insert,
    /// Columns of an existing row changed (payload may be partial)
    Update,
    /// A row was removed
    Delete,
}

/// One row-level change notification: `{eventType, new?, old?}`.
///
/// Payloads are JSON objects of column values. An `Update` payload may be
/// partial; consumers merge it field by field into their cached record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeMessage {
    /// Table the change happened on
    pub table: Table,
    /// Insert, update, or delete
    pub kind: ChangeKind,
    /// New row values (insert and update)
    pub new: Option<Map<String, Value>>,
    /// Old row values (delete; at minimum the id)
    pub old: Option<Map<String, Value>>,
}

fn as_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

impl ChangeMessage {
    /// Builds an insert notification. Non-object payloads become empty.
    #[must_use]
    pub fn insert(table: Table, new: Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Insert,
            new: as_object(new),
            old: None,
        }
    }

    /// Builds an update notification carrying the changed columns.
    #[must_use]
    pub fn update(table: Table, new: Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Update,
            new: as_object(new),
            old: None,
        }
    }

    /// Builds a delete notification carrying the old row (or just its id).
    #[must_use]
    pub fn delete(table: Table, old: Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Delete,
            new: None,
            old: as_object(old),
        }
    }

    /// Owning user of the changed row, read from the payload.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .and_then(|payload| payload.get("user_id"))
            .and_then(Value::as_str)
    }
}

/// Result of draining a subscription's queue.
#[derive(Debug, Default)]
pub struct Drained {
    /// Matching messages, in delivery order
    pub messages: Vec<ChangeMessage>,
    /// True when the receiver lagged and notifications were dropped;
    /// the consumer should reload its collection
    pub lagged: bool,
}

/// Broadcast hub for change notifications.
///
/// The connected backend publishes here after every write; tests publish
/// directly to simulate remote activity.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeMessage>,
}

impl ChangeFeed {
    /// Creates a feed with the default queue capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a feed that queues at most `capacity` undelivered messages
    /// per subscription before it starts dropping the oldest.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a change to every live subscription.
    ///
    /// A feed with no subscribers drops the message silently; that is the
    /// normal state before any screen has mounted.
    pub fn publish(&self, message: ChangeMessage) {
        debug!(
            table = message.table.name(),
            kind = ?message.kind,
            "publishing change notification"
        );
        let _ = self.sender.send(message);
    }

    /// Opens a subscription scoped to one table and one user.
    ///
    /// Each call returns an independent queue; a store keeps exactly one and
    /// replaces it (dropping the old one) when the user changes.
    #[must_use]
    pub fn subscribe(&self, table: Table, user_id: &str) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            table,
            user_id: user_id.to_string(),
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// One live subscription: a filtered receiver over the feed.
///
/// Teardown is `Drop`; dropping an already-torn-down subscription is a no-op,
/// so replacing a subscription is always safe.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeMessage>,
    table: Table,
    user_id: String,
}

impl Subscription {
    /// Drains every queued notification that matches this subscription's
    /// table and user, preserving delivery order.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    if message.table == self.table
                        && message.user_id() == Some(self.user_id.as_str())
                    {
                        drained.messages.push(message);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!(
                        missed,
                        table = self.table.name(),
                        "change feed lagged; collection reload required"
                    );
                    drained.lagged = true;
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        drained
    }

    /// Table this subscription watches.
    #[must_use]
    pub const fn table(&self) -> Table {
        self.table
    }
}
