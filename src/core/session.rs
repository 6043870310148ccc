//! Session lifecycle and the per-user store bundle.
//!
//! Rather than ambient mutable singletons, the signed-in user's stores live
//! in one explicit [`AppState`] object: populated on sign-in, torn down
//! (collections cleared, subscriptions dropped) on sign-out. A second
//! sign-in replaces the previous bundle outright, which also replaces every
//! realtime subscription.

use crate::{
    backend::BackendClient,
    core::{
        balance::BalanceStore, events::EventsStore, insights::InsightsStore,
        payouts::PayoutPlansStore,
    },
};
use tracing::info;

/// The authenticated user, as the identity provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The provider-assigned user id every store scopes to
    pub user_id: String,
    /// Sign-in email, when the provider exposes it
    pub email: Option<String>,
}

impl Session {
    /// A session for the given user.
    #[must_use]
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
        }
    }
}

/// Every per-user store, created together on sign-in.
#[derive(Debug)]
pub struct Stores {
    /// Notifications and their realtime subscription
    pub events: EventsStore,
    /// Metrics, trends, and vault performance
    pub insights: InsightsStore,
    /// Payout plans and their realtime subscription
    pub payouts: PayoutPlansStore,
    /// Wallet balances and the show/hide toggle
    pub balance: BalanceStore,
}

/// Application state: the optional session and its stores.
#[derive(Debug, Default)]
pub struct AppState {
    session: Option<Session>,
    stores: Option<Stores>,
}

impl AppState {
    /// Signed-out state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: None,
            stores: None,
        }
    }

    /// The current session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The signed-in user's stores, if any.
    #[must_use]
    pub fn stores(&mut self) -> Option<&mut Stores> {
        self.stores.as_mut()
    }

    /// Builds the store bundle for `session` and opens the realtime
    /// subscriptions. Any previous bundle (a different user, or a repeated
    /// sign-in) is dropped first, tearing down its subscriptions.
    pub fn sign_in(&mut self, session: Session, backend: &BackendClient) -> &mut Stores {
        info!(user_id = %session.user_id, "signing in");

        let mut events = EventsStore::new(session.user_id.clone());
        events.subscribe(backend);
        let mut payouts = PayoutPlansStore::new(session.user_id.clone());
        payouts.subscribe(backend);

        let stores = Stores {
            events,
            insights: InsightsStore::new(session.user_id.clone()),
            payouts,
            balance: BalanceStore::new(session.user_id.clone()),
        };

        self.session = Some(session);
        self.stores = Some(stores);
        // Just inserted above
        self.stores.as_mut().unwrap_or_else(|| unreachable!())
    }

    /// Clears the session and every cached collection.
    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user_id, "signing out");
        }
        self.stores = None;
    }

    /// True when a session is present.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
