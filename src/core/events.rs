//! Events store - the notifications feed.
//!
//! Holds the user's event collection, keeps it reconciled against the
//! realtime feed, and applies the optimistic mark-as-read writes. Mark-read
//! failures are logged and deliberately not rolled back; local state may
//! diverge from the backend until the next full load.

use crate::{
    backend::{BackendClient, EventRecord, Subscription, Table},
    core::collection::{ChangeOutcome, Collection, Record},
    entities::event::EventStatus,
};
use tracing::warn;

impl Record for EventRecord {
    fn record_id(&self) -> &str {
        &self.event.id
    }
}

/// Local store for one user's events.
#[derive(Debug)]
pub struct EventsStore {
    user_id: String,
    collection: Collection<EventRecord>,
    subscription: Option<Subscription>,
}

impl EventsStore {
    /// An empty store scoped to one user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            collection: Collection::new(),
            subscription: None,
        }
    }

    /// The user this store is scoped to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The cached events, newest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.collection.items()
    }

    /// True while the initial or a reload fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.collection.is_loading()
    }

    /// Message from the most recent failed load, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.collection.error()
    }

    /// Number of cached events still unread.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.collection
            .items()
            .iter()
            .filter(|r| r.event.status == EventStatus::Unread)
            .count()
    }

    /// Fetches the full collection, replacing local state on success. On
    /// failure the error surfaces via [`Self::error`] and prior items stay.
    pub async fn load(&mut self, backend: &BackendClient) {
        self.collection.begin_load();
        match backend.fetch_events(&self.user_id).await {
            Ok(records) => self.collection.complete_load(records),
            Err(e) => self
                .collection
                .fail_load(format!("Failed to fetch events: {e}")),
        }
    }

    /// Opens (or replaces) this store's realtime subscription. The previous
    /// subscription, if any, is torn down first so nothing is delivered
    /// twice. Mock mode has no feed, so this is a no-op there.
    pub fn subscribe(&mut self, backend: &BackendClient) {
        self.subscription = backend
            .feed()
            .map(|feed| feed.subscribe(Table::Events, &self.user_id));
    }

    /// Drains queued change notifications and applies them in delivery
    /// order. Each message runs to completion before the next; an insert (or
    /// a lagged feed, or a merge failure) schedules one full reload, executed
    /// once after the drain.
    pub async fn sync(&mut self, backend: &BackendClient) {
        let Some(subscription) = self.subscription.as_mut() else {
            return;
        };

        let drained = subscription.drain();
        let mut reload = drained.lagged;
        for message in drained.messages {
            match self.collection.apply_change(&message) {
                Ok(ChangeOutcome::ReloadRequired) => reload = true,
                Ok(ChangeOutcome::Applied | ChangeOutcome::Ignored) => {}
                Err(e) => {
                    warn!(error = %e, "event change failed to merge; reloading");
                    reload = true;
                }
            }
        }

        if reload {
            self.load(backend).await;
        }
    }

    /// Optimistically marks one event read, then persists the change.
    ///
    /// The local flip happens before the backend write and is kept even when
    /// the write fails (fire-and-forget; failure is logged only).
    pub async fn mark_read(&mut self, backend: &BackendClient, event_id: &str) {
        for record in self.collection.items_mut() {
            if record.event.id == event_id {
                record.event.status = EventStatus::Read;
            }
        }

        // The write goes out even when the id is not cached locally; the
        // cache may be stale or mid-reload while the row exists upstream.
        if let Err(e) = backend.mark_event_read(event_id, &self.user_id).await {
            warn!(
                error = %e,
                event_id,
                "failed to persist mark-read; local state left optimistic"
            );
        }
    }

    /// Optimistically marks every unread event read, then persists.
    ///
    /// Immediately after this call the local view shows zero unread events,
    /// regardless of backend latency or outcome.
    pub async fn mark_all_read(&mut self, backend: &BackendClient) {
        let mut any_unread = false;
        for record in self.collection.items_mut() {
            if record.event.status == EventStatus::Unread {
                record.event.status = EventStatus::Read;
                any_unread = true;
            }
        }
        if !any_unread {
            return;
        }

        if let Err(e) = backend.mark_all_events_read(&self.user_id).await {
            warn!(
                error = %e,
                "failed to persist mark-all-read; local state left optimistic"
            );
        }
    }

    /// Drops cached events and the subscription; used on sign-out.
    pub fn clear(&mut self) {
        self.collection.clear();
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::backend::{ChangeMessage, Table};
    use crate::entities::event::EventType;
    use crate::errors::Result;
    use crate::test_utils::*;
    use sea_orm::{ConnectionTrait, Statement};
    use serde_json::json;

    async fn drop_events_table(backend: &BackendClient) {
        let db = backend.database().unwrap();
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "DROP TABLE events".to_string(),
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_load_replaces_local_state() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;
        create_test_event(db, "evt-2", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;

        assert!(store.error().is_none());
        assert!(!store.is_loading());
        assert_eq!(store.events().len(), 2);
        assert_eq!(store.unread_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_failure_keeps_prior_items_and_sets_error() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;
        assert_eq!(store.events().len(), 1);

        drop_events_table(&backend).await;
        store.load(&backend).await;

        assert!(store.error().is_some());
        assert_eq!(store.events().len(), 1, "stale items stay visible");

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_is_optimistic_and_persisted() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;
        store.mark_read(&backend, "evt-1").await;

        assert_eq!(store.unread_count(), 0);

        // Persisted: a fresh load still reports it read
        store.load(&backend).await;
        assert_eq!(store.events()[0].event.status, EventStatus::Read);

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_persists_even_when_not_cached() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;
        assert!(store.events().is_empty());

        // Row appeared upstream after the load; the write must still go out
        create_test_event(db, "evt-late", "user-1").await?;
        store.mark_read(&backend, "evt-late").await;

        store.load(&backend).await;
        assert_eq!(store.events()[0].event.status, EventStatus::Read);

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_failure_is_not_rolled_back() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;

        drop_events_table(&backend).await;
        store.mark_read(&backend, "evt-1").await;

        // Backend write failed; the optimistic flip stays
        assert_eq!(store.unread_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_all_read_shows_zero_unread_immediately() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;
        create_test_event(db, "evt-2", "user-1").await?;
        create_test_event(db, "evt-3", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;
        assert_eq!(store.unread_count(), 3);

        store.mark_all_read(&backend).await;
        assert_eq!(store.unread_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sync_reloads_on_remote_insert() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();

        let mut store = EventsStore::new("user-1");
        store.subscribe(&backend);
        store.load(&backend).await;
        assert!(store.events().is_empty());

        // Remote insert: row appears in the table and a notification follows
        create_custom_event(db, "evt-1", "user-1", EventType::VaultCreated, None, None).await?;
        backend.feed().unwrap().publish(ChangeMessage::insert(
            Table::Events,
            json!({ "id": "evt-1", "user_id": "user-1" }),
        ));

        store.sync(&backend).await;
        assert_eq!(store.events().len(), 1);
        assert_eq!(store.events()[0].event.id, "evt-1");

        Ok(())
    }

    #[tokio::test]
    async fn test_sync_merges_remote_update_preserving_relations() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_bank_account(db, "acct-1", "user-1").await?;
        create_custom_plan(db, "plan-1", "user-1", "Rent Vault", Some("acct-1")).await?;
        create_custom_event(
            db,
            "evt-1",
            "user-1",
            EventType::PayoutCompleted,
            Some("plan-1"),
            None,
        )
        .await?;

        let mut store = EventsStore::new("user-1");
        store.subscribe(&backend);
        store.load(&backend).await;
        assert!(store.events()[0].payout_plan.is_some());

        backend.feed().unwrap().publish(ChangeMessage::update(
            Table::Events,
            json!({ "id": "evt-1", "user_id": "user-1", "status": "read" }),
        ));
        store.sync(&backend).await;

        let record = &store.events()[0];
        assert_eq!(record.event.status, EventStatus::Read);
        // The partial payload did not clobber the joined plan
        assert_eq!(
            record.payout_plan.as_ref().unwrap().name,
            "Rent Vault"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sync_applies_remote_delete_and_ignores_unknown_ids() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.subscribe(&backend);
        store.load(&backend).await;

        let feed = backend.feed().unwrap();
        feed.publish(ChangeMessage::delete(
            Table::Events,
            json!({ "id": "never-cached", "user_id": "user-1" }),
        ));
        feed.publish(ChangeMessage::delete(
            Table::Events,
            json!({ "id": "evt-1", "user_id": "user-1" }),
        ));

        store.sync(&backend).await;
        assert!(store.events().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_resubscribe_does_not_duplicate_delivery() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.subscribe(&backend);
        // User id unchanged, screen remounts: the old subscription is replaced
        store.subscribe(&backend);
        store.load(&backend).await;

        backend.feed().unwrap().publish(ChangeMessage::update(
            Table::Events,
            json!({ "id": "evt-1", "user_id": "user-1", "status": "read" }),
        ));
        store.sync(&backend).await;

        assert_eq!(store.events()[0].event.status, EventStatus::Read);
        // A second sync finds an empty queue, not a replayed message
        store.sync(&backend).await;
        assert_eq!(store.events().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_read_status_survives_reload() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.load(&backend).await;
        store.mark_read(&backend, "evt-1").await;

        // Loads never spuriously reset a read event to unread
        store.load(&backend).await;
        store.load(&backend).await;
        assert_eq!(store.events()[0].event.status, EventStatus::Read);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_drops_events_and_subscription() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_event(db, "evt-1", "user-1").await?;

        let mut store = EventsStore::new("user-1");
        store.subscribe(&backend);
        store.load(&backend).await;
        store.clear();

        assert!(store.events().is_empty());
        // With no subscription, sync is a no-op rather than an error
        store.sync(&backend).await;
        assert!(store.events().is_empty());

        Ok(())
    }
}
