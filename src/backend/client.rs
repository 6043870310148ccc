//! Backend client - scoped reads, mark-read writes, and the insights RPC.
//!
//! [`BackendClient`] is either connected (owning a `SeaORM` connection plus
//! the change feed it publishes to) or disconnected. Disconnected is the mock
//! mode the app degrades to when configuration is missing: every read returns
//! an empty collection and every write returns a configuration error, so the
//! app starts and renders instead of crashing.
//!
//! All queries are scoped to one user and ordered newest first, matching the
//! hosted backend's row-level security model.

use crate::{
    config::app::AppConfig,
    entities::{
        BankAccount, Event, PayoutPlan, PerformanceTrend, Transaction, UserMetric,
        VaultPerformance, Wallet, bank_account, event, payout_plan, performance_trend, transaction,
        user_metric, vault_performance, wallet,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveEnum, Database, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use super::feed::{ChangeFeed, ChangeMessage, Table};

/// Plan fields joined onto an event for the notification detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPlan {
    /// Plan display name
    pub name: String,
    /// Amount disbursed per payout, in naira
    pub payout_amount: i64,
    /// Destination account id, if one is linked
    pub bank_account_id: Option<String>,
    /// The linked account's display fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<RelatedBankAccount>,
}

/// Bank account fields joined through the related plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedBankAccount {
    /// Bank display name
    pub bank_name: String,
    /// Account number as the backend stores it
    pub account_number: String,
}

/// Transaction fields joined onto an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedTransaction {
    /// Amount moved, in naira
    pub amount: i64,
    /// Settlement status
    pub status: transaction::TransactionStatus,
    /// Deposit, payout, or withdrawal
    pub transaction_type: transaction::TransactionType,
}

/// An event row plus its joined related data, as the initial load returns it.
///
/// The row fields are flattened so a partial change payload merges straight
/// onto them; the joined relations live under their own keys and survive any
/// merge that does not name them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The event row itself
    #[serde(flatten)]
    pub event: event::Model,
    /// Joined plan data, when the event references a plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_plan: Option<RelatedPlan>,
    /// Joined transaction data, when the event references a transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<RelatedTransaction>,
}

/// A vault performance row plus the related plan's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultPerformanceRecord {
    /// The performance row itself
    #[serde(flatten)]
    pub row: vault_performance::Model,
    /// Display name of the plan the row measures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
}

#[derive(Debug)]
enum Inner {
    Connected {
        db: DatabaseConnection,
        feed: ChangeFeed,
    },
    Disconnected,
}

/// Client for the hosted backend, or its mock stand-in.
#[derive(Debug)]
pub struct BackendClient {
    inner: Inner,
}

fn not_configured(operation: &str) -> Error {
    Error::Config {
        message: format!("backend not configured; cannot {operation}"),
    }
}

impl BackendClient {
    /// Connects according to the loaded configuration, degrading to mock mode
    /// when the URL or anonymous key is missing.
    ///
    /// # Errors
    /// Fails only when configuration is present but the backend is unreachable.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        match (&config.backend_url, &config.anon_key) {
            (Some(url), Some(_key)) => {
                let db = Database::connect(url).await?;
                tracing::info!("connected to backend");
                Ok(Self::from_connection(db))
            }
            _ => Ok(Self::disconnected()),
        }
    }

    /// Wraps an existing connection; used by tests and local tooling.
    #[must_use]
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            inner: Inner::Connected {
                db,
                feed: ChangeFeed::new(),
            },
        }
    }

    /// The mock client: empty reads, configuration errors on writes.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self {
            inner: Inner::Disconnected,
        }
    }

    /// True when a real backend connection is live.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self.inner, Inner::Connected { .. })
    }

    /// The underlying connection, when connected. Exposed for seeding and
    /// local tooling; application code goes through the typed methods.
    #[must_use]
    pub const fn database(&self) -> Option<&DatabaseConnection> {
        match &self.inner {
            Inner::Connected { db, .. } => Some(db),
            Inner::Disconnected => None,
        }
    }

    /// The realtime change feed, when connected. Mock mode has no feed.
    #[must_use]
    pub const fn feed(&self) -> Option<&ChangeFeed> {
        match &self.inner {
            Inner::Connected { feed, .. } => Some(feed),
            Inner::Disconnected => None,
        }
    }

    fn publish(&self, message: ChangeMessage) {
        if let Some(feed) = self.feed() {
            feed.publish(message);
        }
    }

    /// Fetches the user's events, newest first, with related plan (and its
    /// bank account) and related transaction joined on.
    pub async fn fetch_events(&self, user_id: &str) -> Result<Vec<EventRecord>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };

        let rows = Event::find()
            .filter(event::Column::UserId.eq(user_id))
            .order_by_desc(event::Column::CreatedAt)
            .all(db)
            .await?;

        let plan_ids: Vec<String> = rows.iter().filter_map(|e| e.payout_plan_id.clone()).collect();
        let mut plans: HashMap<String, RelatedPlan> = HashMap::new();
        if !plan_ids.is_empty() {
            let joined = PayoutPlan::find()
                .filter(payout_plan::Column::Id.is_in(plan_ids))
                .find_also_related(BankAccount)
                .all(db)
                .await?;
            for (plan, account) in joined {
                plans.insert(
                    plan.id.clone(),
                    RelatedPlan {
                        name: plan.name,
                        payout_amount: plan.payout_amount,
                        bank_account_id: plan.bank_account_id,
                        bank_account: account.map(|a| RelatedBankAccount {
                            bank_name: a.bank_name,
                            account_number: a.account_number,
                        }),
                    },
                );
            }
        }

        let tx_ids: Vec<String> = rows.iter().filter_map(|e| e.transaction_id.clone()).collect();
        let mut txs: HashMap<String, RelatedTransaction> = HashMap::new();
        if !tx_ids.is_empty() {
            let joined = Transaction::find()
                .filter(transaction::Column::Id.is_in(tx_ids))
                .all(db)
                .await?;
            for tx in joined {
                txs.insert(
                    tx.id.clone(),
                    RelatedTransaction {
                        amount: tx.amount,
                        status: tx.status,
                        transaction_type: tx.transaction_type,
                    },
                );
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let payout_plan = row
                    .payout_plan_id
                    .as_ref()
                    .and_then(|id| plans.get(id))
                    .cloned();
                let related_tx = row
                    .transaction_id
                    .as_ref()
                    .and_then(|id| txs.get(id))
                    .cloned();
                EventRecord {
                    event: row,
                    payout_plan,
                    transaction: related_tx,
                }
            })
            .collect())
    }

    /// Fetches the user's payout plans, newest first.
    pub async fn fetch_payout_plans(&self, user_id: &str) -> Result<Vec<payout_plan::Model>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };
        PayoutPlan::find()
            .filter(payout_plan::Column::UserId.eq(user_id))
            .order_by_desc(payout_plan::Column::CreatedAt)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches the user's transactions, newest first.
    pub async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<transaction::Model>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };
        Transaction::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .order_by_desc(transaction::Column::CreatedAt)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches the user's wallet row, if one exists.
    pub async fn fetch_wallet(&self, user_id: &str) -> Result<Option<wallet::Model>> {
        let Some(db) = self.database() else {
            return Ok(None);
        };
        Wallet::find()
            .filter(wallet::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches the user's linked bank accounts.
    pub async fn fetch_bank_accounts(&self, user_id: &str) -> Result<Vec<bank_account::Model>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };
        BankAccount::find()
            .filter(bank_account::Column::UserId.eq(user_id))
            .order_by_asc(bank_account::Column::BankName)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches the user's metric rows for one day, ordered by metric type.
    pub async fn fetch_metrics(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<user_metric::Model>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };
        UserMetric::find()
            .filter(user_metric::Column::UserId.eq(user_id))
            .filter(user_metric::Column::MetricDate.eq(date))
            .order_by_asc(user_metric::Column::MetricType)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches the user's performance trends, newest first.
    pub async fn fetch_trends(&self, user_id: &str) -> Result<Vec<performance_trend::Model>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };
        PerformanceTrend::find()
            .filter(performance_trend::Column::UserId.eq(user_id))
            .order_by_desc(performance_trend::Column::CreatedAt)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Fetches vault performance rows with the related plan name, newest first.
    pub async fn fetch_vault_performance(
        &self,
        user_id: &str,
    ) -> Result<Vec<VaultPerformanceRecord>> {
        let Some(db) = self.database() else {
            return Ok(Vec::new());
        };

        let joined = VaultPerformance::find()
            .filter(vault_performance::Column::UserId.eq(user_id))
            .order_by_desc(vault_performance::Column::CreatedAt)
            .find_also_related(PayoutPlan)
            .all(db)
            .await?;

        Ok(joined
            .into_iter()
            .map(|(row, plan)| VaultPerformanceRecord {
                row,
                plan_name: plan.map(|p| p.name),
            })
            .collect())
    }

    /// Marks one event read, scoped to `(id, user_id)`, and publishes the
    /// resulting partial update on the change feed.
    ///
    /// # Errors
    /// `Error::Config` in mock mode; `Error::NotFound` when the event does not
    /// exist for this user.
    pub async fn mark_event_read(&self, event_id: &str, user_id: &str) -> Result<()> {
        let Some(db) = self.database() else {
            return Err(not_configured("mark event read"));
        };

        let row = Event::find_by_id(event_id)
            .filter(event::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "event",
                id: event_id.to_string(),
            })?;

        if row.status == event::EventStatus::Read {
            return Ok(());
        }

        let mut active: event::ActiveModel = row.into();
        active.status = Set(event::EventStatus::Read);
        active.update(db).await?;

        self.publish(ChangeMessage::update(
            Table::Events,
            json!({ "id": event_id, "user_id": user_id, "status": "read" }),
        ));
        Ok(())
    }

    /// Marks every unread event for the user read, publishing one partial
    /// update per changed row.
    ///
    /// # Errors
    /// `Error::Config` in mock mode.
    pub async fn mark_all_events_read(&self, user_id: &str) -> Result<()> {
        let Some(db) = self.database() else {
            return Err(not_configured("mark all events read"));
        };

        // All-or-nothing: a failure mid-loop must not leave a prefix of rows
        // marked, so the updates share a transaction and the feed messages go
        // out only after commit.
        let txn = db.begin().await?;

        let unread = Event::find()
            .filter(event::Column::UserId.eq(user_id))
            .filter(event::Column::Status.eq(event::EventStatus::Unread))
            .all(&txn)
            .await?;

        let mut changed = Vec::with_capacity(unread.len());
        for row in unread {
            let id = row.id.clone();
            let mut active: event::ActiveModel = row.into();
            active.status = Set(event::EventStatus::Read);
            active.update(&txn).await?;
            changed.push(id);
        }

        txn.commit().await?;

        for id in changed {
            self.publish(ChangeMessage::update(
                Table::Events,
                json!({ "id": id, "user_id": user_id, "status": "read" }),
            ));
        }
        Ok(())
    }

    /// The `refresh_insights_data` RPC: recomputes today's metric rows from
    /// the user's plans and transactions. Must run before reading insight
    /// tables; the aggregation itself is the backend's concern, reproduced
    /// here so local databases behave like the hosted one.
    ///
    /// # Errors
    /// `Error::Config` in mock mode.
    #[allow(clippy::cast_possible_wrap)]
    pub async fn refresh_insights(&self, user_id: &str) -> Result<()> {
        let Some(db) = self.database() else {
            return Err(not_configured("refresh insights"));
        };

        // The delete-then-reinsert must be atomic; a failure between the two
        // would leave today's rows missing entirely.
        let txn = db.begin().await?;

        let plans = PayoutPlan::find()
            .filter(payout_plan::Column::UserId.eq(user_id))
            .all(&txn)
            .await?;
        let txs = Transaction::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .all(&txn)
            .await?;

        let payouts: i64 = plans
            .iter()
            .map(|p| i64::from(p.completed_payouts) * p.payout_amount)
            .sum();
        let deposits: i64 = txs
            .iter()
            .filter(|t| t.transaction_type == transaction::TransactionType::Deposit)
            .map(|t| t.amount)
            .sum();
        let active_plans = plans
            .iter()
            .filter(|p| p.status == payout_plan::PlanStatus::Active)
            .count() as i64;
        let transactions = txs.len() as i64;

        let today = Utc::now().date_naive();

        // Replace today's rows wholesale; one row per (user, type, date).
        UserMetric::delete_many()
            .filter(user_metric::Column::UserId.eq(user_id))
            .filter(user_metric::Column::MetricDate.eq(today))
            .exec(&txn)
            .await?;

        let values = [
            (user_metric::MetricType::Payouts, payouts),
            (user_metric::MetricType::Deposits, deposits),
            (user_metric::MetricType::ActivePlans, active_plans),
            (user_metric::MetricType::Transactions, transactions),
        ];
        for (metric_type, metric_value) in values {
            let row = user_metric::ActiveModel {
                id: Set(format!("{user_id}:{}:{today}", metric_type.to_value())),
                user_id: Set(user_id.to_string()),
                metric_type: Set(metric_type),
                metric_value: Set(metric_value),
                metric_date: Set(today),
            };
            row.insert(&txn).await?;
        }

        txn.commit().await?;

        tracing::debug!(user_id, "insights refreshed");
        Ok(())
    }
}
