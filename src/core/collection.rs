//! Collection store - the local, read-mostly copy of one user-scoped
//! collection, kept consistent with the backend under local mutations and
//! asynchronous remote notifications.
//!
//! Reconciliation is a pure function over `(current items, change message)`:
//! inserts request a full reload (the payload lacks joined related data),
//! updates merge field by field into the matching record, deletes remove by
//! id. Changes apply strictly in the order received.

use crate::backend::{ChangeKind, ChangeMessage};
use crate::errors::Result;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A cached record addressable by its backend id.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// The backend-assigned id change payloads match against.
    fn record_id(&self) -> &str;
}

/// What applying one change notification did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// A record was merged or removed
    Applied,
    /// The change referenced no cached record, or carried no payload
    Ignored,
    /// The caller must reload the collection from the backend
    ReloadRequired,
}

/// Local state of one collection: items, load flight, last load error.
#[derive(Debug, Clone)]
pub struct Collection<T: Record> {
    items: Vec<T>,
    is_loading: bool,
    error: Option<String>,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Collection<T> {
    /// An empty collection that has never loaded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    /// The cached records, in backend order (newest first).
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable access for optimistic local updates. The slice cannot grow;
    /// records enter and leave only through loads and change notifications.
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// True while a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Human-readable message from the most recent failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no records are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marks a load in flight and clears the previous error.
    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Replaces the cached items with a freshly fetched collection.
    pub fn complete_load(&mut self, items: Vec<T>) {
        self.items = items;
        self.is_loading = false;
        self.error = None;
    }

    /// Records a load failure. Prior items are kept untouched so the screen
    /// can keep showing stale data alongside the error.
    pub fn fail_load(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }

    /// Drops every cached item and resets flags; used on sign-out.
    pub fn clear(&mut self) {
        self.items.clear();
        self.is_loading = false;
        self.error = None;
    }

    /// Applies one remote change notification.
    ///
    /// # Errors
    /// Returns a serialization error only when a merged record no longer
    /// deserializes; callers treat that as a reload signal.
    pub fn apply_change(&mut self, message: &ChangeMessage) -> Result<ChangeOutcome> {
        match message.kind {
            // Inserted rows need joined related data the payload lacks
            ChangeKind::Insert => Ok(ChangeOutcome::ReloadRequired),
            ChangeKind::Update => {
                let Some(payload) = &message.new else {
                    return Ok(ChangeOutcome::Ignored);
                };
                let Some(id) = payload.get("id").and_then(Value::as_str) else {
                    return Ok(ChangeOutcome::Ignored);
                };
                match self.items.iter_mut().find(|item| item.record_id() == id) {
                    Some(slot) => {
                        *slot = merge_partial(slot, payload)?;
                        Ok(ChangeOutcome::Applied)
                    }
                    None => Ok(ChangeOutcome::Ignored),
                }
            }
            ChangeKind::Delete => {
                let Some(id) = message
                    .old
                    .as_ref()
                    .and_then(|old| old.get("id"))
                    .and_then(Value::as_str)
                else {
                    return Ok(ChangeOutcome::Ignored);
                };
                let before = self.items.len();
                self.items.retain(|item| item.record_id() != id);
                if self.items.len() == before {
                    // Deleting a record we never cached is a no-op
                    Ok(ChangeOutcome::Ignored)
                } else {
                    Ok(ChangeOutcome::Applied)
                }
            }
        }
    }
}

/// Overlays the payload's fields onto the record, preserving every field the
/// payload does not name (joined relation data in particular).
fn merge_partial<T: Record>(record: &T, payload: &Map<String, Value>) -> Result<T> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut value {
        for (key, new_value) in payload {
            fields.insert(key.clone(), new_value.clone());
        }
    }
    Ok(serde_json::from_value(value)?)
}
