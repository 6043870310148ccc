//! Payout plans store and the home-screen aggregates derived from it.

use crate::{
    backend::{BackendClient, Subscription, Table},
    core::collection::{ChangeOutcome, Collection, Record},
    core::format::calculate_progress,
    entities::payout_plan::{self, PlanStatus},
};
use tracing::warn;

impl Record for payout_plan::Model {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Local store for one user's payout plans.
#[derive(Debug)]
pub struct PayoutPlansStore {
    user_id: String,
    collection: Collection<payout_plan::Model>,
    subscription: Option<Subscription>,
}

impl PayoutPlansStore {
    /// An empty store scoped to one user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            collection: Collection::new(),
            subscription: None,
        }
    }

    /// The cached plans, newest first.
    #[must_use]
    pub fn plans(&self) -> &[payout_plan::Model] {
        self.collection.items()
    }

    /// True while a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.collection.is_loading()
    }

    /// Message from the most recent failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.collection.error()
    }

    /// Fetches the full collection; failures surface via [`Self::error`] and
    /// leave prior items untouched.
    pub async fn load(&mut self, backend: &BackendClient) {
        self.collection.begin_load();
        match backend.fetch_payout_plans(&self.user_id).await {
            Ok(plans) => self.collection.complete_load(plans),
            Err(e) => self
                .collection
                .fail_load(format!("Failed to fetch payout plans: {e}")),
        }
    }

    /// Opens (or replaces) the realtime subscription for plan changes.
    pub fn subscribe(&mut self, backend: &BackendClient) {
        self.subscription = backend
            .feed()
            .map(|feed| feed.subscribe(Table::PayoutPlans, &self.user_id));
    }

    /// Applies queued plan change notifications in delivery order.
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
                    warn!(error = %e, "plan change failed to merge; reloading");
                    reload = true;
                }
            }
        }

        if reload {
            self.load(backend).await;
        }
    }

    /// Plans currently disbursing.
    #[must_use]
    pub fn active_plans(&self) -> Vec<&payout_plan::Model> {
        self.plans()
            .iter()
            .filter(|p| p.status == PlanStatus::Active)
            .collect()
    }

    /// The active plan with the soonest upcoming payout date, if any.
    #[must_use]
    pub fn next_payout(&self) -> Option<&payout_plan::Model> {
        self.active_plans()
            .into_iter()
            .filter(|p| p.next_payout_date.is_some())
            .min_by_key(|p| p.next_payout_date)
    }

    /// Total amount already disbursed across all plans, in naira.
    #[must_use]
    pub fn total_paid_out(&self) -> i64 {
        self.plans()
            .iter()
            .map(|p| i64::from(p.completed_payouts) * p.payout_amount)
            .sum()
    }

    /// Amount still owed by active plans, in naira.
    #[must_use]
    pub fn pending_payouts(&self) -> i64 {
        self.active_plans()
            .iter()
            .map(|p| i64::from(p.duration - p.completed_payouts) * p.payout_amount)
            .sum()
    }

    /// Share of plans that have completed, as a whole percentage (0 when the
    /// user has no plans).
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn completion_rate(&self) -> i64 {
        let completed = self
            .plans()
            .iter()
            .filter(|p| p.status == PlanStatus::Completed)
            .count();
        calculate_progress(completed as i64, self.plans().len() as i64)
    }

    /// Drops cached plans and the subscription; used on sign-out.
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
    use crate::errors::Result;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn test_aggregates_match_home_screen_arithmetic() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();

        // Active: 3/10 payouts of 20,000 done
        create_test_plan(db, "plan-1", "user-1").await?;
        // Completed: 5/5 payouts of 10,000 done
        create_completed_plan(db, "plan-2", "user-1", 5, 10_000).await?;

        let mut store = PayoutPlansStore::new("user-1");
        store.load(&backend).await;

        assert_eq!(store.plans().len(), 2);
        assert_eq!(store.total_paid_out(), 3 * 20_000 + 5 * 10_000);
        assert_eq!(store.pending_payouts(), 7 * 20_000);
        assert_eq!(store.completion_rate(), 50);
        assert_eq!(store.active_plans().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_completion_rate_with_no_plans_is_zero() -> Result<()> {
        let backend = setup_test_backend().await?;
        let mut store = PayoutPlansStore::new("user-1");
        store.load(&backend).await;

        assert_eq!(store.completion_rate(), 0);
        assert_eq!(store.total_paid_out(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_next_payout_picks_soonest_active_date() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();

        create_plan_with_next_payout(
            db,
            "plan-later",
            "user-1",
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
        )
        .await?;
        create_plan_with_next_payout(
            db,
            "plan-soon",
            "user-1",
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        )
        .await?;

        let mut store = PayoutPlansStore::new("user-1");
        store.load(&backend).await;

        assert_eq!(store.next_payout().unwrap().id, "plan-soon");

        Ok(())
    }

    #[tokio::test]
    async fn test_sync_merges_plan_status_update() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_plan(db, "plan-1", "user-1").await?;

        let mut store = PayoutPlansStore::new("user-1");
        store.subscribe(&backend);
        store.load(&backend).await;
        assert_eq!(store.plans()[0].status, PlanStatus::Active);

        backend.feed().unwrap().publish(ChangeMessage::update(
            Table::PayoutPlans,
            json!({ "id": "plan-1", "user_id": "user-1", "status": "paused" }),
        ));
        store.sync(&backend).await;

        assert_eq!(store.plans()[0].status, PlanStatus::Paused);
        // Fields the payload omitted are intact
        assert_eq!(store.plans()[0].payout_amount, 20_000);

        Ok(())
    }
}
