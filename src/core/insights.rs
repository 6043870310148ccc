//! Insights store - metrics, trends, and vault performance.
//!
//! Loading always invokes the backend's `refresh_insights_data` RPC first so
//! the insight tables are recomputed before they are read; the three
//! collections are then fetched in sequence. A failure anywhere surfaces one
//! error and leaves every previously loaded collection untouched.

use crate::{
    backend::{BackendClient, VaultPerformanceRecord},
    core::collection::{Collection, Record},
    entities::{
        performance_trend,
        user_metric::{self, MetricType},
    },
    errors::Result,
};
use chrono::Utc;

impl Record for user_metric::Model {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for performance_trend::Model {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for VaultPerformanceRecord {
    fn record_id(&self) -> &str {
        &self.row.id
    }
}

/// Local store for one user's insight collections.
#[derive(Debug)]
pub struct InsightsStore {
    user_id: String,
    metrics: Collection<user_metric::Model>,
    trends: Collection<performance_trend::Model>,
    vault_performance: Collection<VaultPerformanceRecord>,
}

impl InsightsStore {
    /// An empty store scoped to one user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            metrics: Collection::new(),
            trends: Collection::new(),
            vault_performance: Collection::new(),
        }
    }

    /// Today's metric rows, ordered by metric type.
    #[must_use]
    pub fn metrics(&self) -> &[user_metric::Model] {
        self.metrics.items()
    }

    /// Period-over-period trends, newest first.
    #[must_use]
    pub fn trends(&self) -> &[performance_trend::Model] {
        self.trends.items()
    }

    /// Per-plan performance rows, newest first.
    #[must_use]
    pub fn vault_performance(&self) -> &[VaultPerformanceRecord] {
        self.vault_performance.items()
    }

    /// Today's value for one metric type, if the backend has computed it.
    #[must_use]
    pub fn metric(&self, metric_type: MetricType) -> Option<i64> {
        self.metrics
            .items()
            .iter()
            .find(|m| m.metric_type == metric_type)
            .map(|m| m.metric_value)
    }

    /// True while any of the three collections is loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.metrics.is_loading()
            || self.trends.is_loading()
            || self.vault_performance.is_loading()
    }

    /// The first error among the three collections, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.metrics
            .error()
            .or_else(|| self.trends.error())
            .or_else(|| self.vault_performance.error())
    }

    /// Refreshes server-side aggregates, then fetches all three collections
    /// and commits them together. On any failure every collection keeps its
    /// prior data and the failure message appears via [`Self::error`].
    pub async fn load(&mut self, backend: &BackendClient) {
        self.metrics.begin_load();
        self.trends.begin_load();
        self.vault_performance.begin_load();

        // All three collections commit together; a failure mid-sequence must
        // not leave one collection refreshed and another stale.
        match self.fetch_all(backend).await {
            Ok((metrics, trends, vault_performance)) => {
                self.metrics.complete_load(metrics);
                self.trends.complete_load(trends);
                self.vault_performance.complete_load(vault_performance);
            }
            Err(e) => {
                let message = format!("Failed to fetch insights data: {e}");
                self.metrics.fail_load(message.clone());
                self.trends.fail_load(message.clone());
                self.vault_performance.fail_load(message);
            }
        }
    }

    async fn fetch_all(
        &self,
        backend: &BackendClient,
    ) -> Result<(
        Vec<user_metric::Model>,
        Vec<performance_trend::Model>,
        Vec<VaultPerformanceRecord>,
    )> {
        // Recompute aggregates before reading them; mock mode fails here.
        backend.refresh_insights(&self.user_id).await?;

        let today = Utc::now().date_naive();
        let metrics = backend.fetch_metrics(&self.user_id, today).await?;
        let trends = backend.fetch_trends(&self.user_id).await?;
        let vault_performance = backend.fetch_vault_performance(&self.user_id).await?;

        Ok((metrics, trends, vault_performance))
    }

    /// Drops every cached collection; used on sign-out.
    pub fn clear(&mut self) {
        self.metrics.clear();
        self.trends.clear();
        self.vault_performance.clear();
    }
}
