//! Shared test utilities.
//!
//! Stands up a connected [`BackendClient`] over an in-memory `SQLite`
//! database and seeds entities with sensible defaults. Seeded timestamps are
//! strictly increasing so newest-first ordering is deterministic.

use crate::{
    backend::BackendClient,
    entities::{
        bank_account, event,
        event::{EventStatus, EventType},
        payout_plan,
        payout_plan::{PlanFrequency, PlanStatus},
        performance_trend,
        performance_trend::TrendType,
        transaction,
        transaction::{TransactionStatus, TransactionType},
        vault_performance, wallet,
    },
    errors::Result,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::atomic::{AtomicI64, Ordering};

static TIMESTAMP_OFFSET: AtomicI64 = AtomicI64::new(0);

/// A creation timestamp strictly later than any previously returned one.
fn next_created_at() -> DateTime<Utc> {
    let offset = TIMESTAMP_OFFSET.fetch_add(1, Ordering::Relaxed);
    Utc::now() + Duration::milliseconds(offset)
}

/// Creates a connected client over an in-memory database with all tables.
/// This is the standard setup for all integration tests.
pub async fn setup_test_backend() -> Result<BackendClient> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(BackendClient::from_connection(db))
}

/// Creates an unread `vault_created` event with no related records.
pub async fn create_test_event(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> Result<event::Model> {
    create_custom_event(db, id, user_id, EventType::VaultCreated, None, None).await
}

/// Creates an unread event with explicit type and related record ids.
pub async fn create_custom_event(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    event_type: EventType,
    payout_plan_id: Option<&str>,
    transaction_id: Option<&str>,
) -> Result<event::Model> {
    let model = event::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        event_type: Set(event_type),
        title: Set("Test event".to_string()),
        description: Set(None),
        status: Set(EventStatus::Unread),
        payout_plan_id: Set(payout_plan_id.map(str::to_string)),
        transaction_id: Set(transaction_id.map(str::to_string)),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}

/// Creates an active monthly plan: 3 of 10 payouts of 20,000 completed.
pub async fn create_test_plan(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> Result<payout_plan::Model> {
    create_custom_plan(db, id, user_id, "Test Vault", None).await
}

/// Creates an active plan with a custom name and destination account.
pub async fn create_custom_plan(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    name: &str,
    bank_account_id: Option<&str>,
) -> Result<payout_plan::Model> {
    let model = payout_plan::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        status: Set(PlanStatus::Active),
        total_amount: Set(200_000),
        payout_amount: Set(20_000),
        duration: Set(10),
        completed_payouts: Set(3),
        frequency: Set(PlanFrequency::Monthly),
        next_payout_date: Set(None),
        bank_account_id: Set(bank_account_id.map(str::to_string)),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}

/// Creates a completed plan with every payout disbursed.
pub async fn create_completed_plan(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    duration: i32,
    payout_amount: i64,
) -> Result<payout_plan::Model> {
    let model = payout_plan::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        name: Set("Completed Vault".to_string()),
        status: Set(PlanStatus::Completed),
        total_amount: Set(i64::from(duration) * payout_amount),
        payout_amount: Set(payout_amount),
        duration: Set(duration),
        completed_payouts: Set(duration),
        frequency: Set(PlanFrequency::Monthly),
        next_payout_date: Set(None),
        bank_account_id: Set(None),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}

/// Creates an active plan with an upcoming payout date.
pub async fn create_plan_with_next_payout(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    next_payout_date: NaiveDate,
) -> Result<payout_plan::Model> {
    let model = payout_plan::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        name: Set("Scheduled Vault".to_string()),
        status: Set(PlanStatus::Active),
        total_amount: Set(200_000),
        payout_amount: Set(20_000),
        duration: Set(10),
        completed_payouts: Set(0),
        frequency: Set(PlanFrequency::Monthly),
        next_payout_date: Set(Some(next_payout_date)),
        bank_account_id: Set(None),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}

/// Creates a completed deposit transaction.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    amount: i64,
) -> Result<transaction::Model> {
    let model = transaction::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        amount: Set(amount),
        status: Set(TransactionStatus::Completed),
        transaction_type: Set(TransactionType::Deposit),
        payout_plan_id: Set(None),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}

/// Creates a GTBank test account.
pub async fn create_test_bank_account(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> Result<bank_account::Model> {
    let model = bank_account::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        bank_name: Set("GTBank".to_string()),
        account_number: Set("0123456789".to_string()),
    };
    Ok(model.insert(db).await?)
}

/// Creates the user's wallet row.
pub async fn create_test_wallet(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    balance: i64,
    locked_balance: i64,
) -> Result<wallet::Model> {
    let model = wallet::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        balance: Set(balance),
        locked_balance: Set(locked_balance),
    };
    Ok(model.insert(db).await?)
}

/// Creates a monthly-growth trend row for the current month.
pub async fn create_test_trend(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> Result<performance_trend::Model> {
    let today = Utc::now().date_naive();
    let model = performance_trend::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        trend_type: Set(TrendType::MonthlyGrowth),
        current_value: Set(120_000),
        previous_value: Set(100_000),
        percentage_change: Set(20.0),
        period_start: Set(today.with_day(1).unwrap_or(today)),
        period_end: Set(today),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}

/// Creates a vault performance row for an existing plan.
pub async fn create_test_vault_performance(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    payout_plan_id: &str,
) -> Result<vault_performance::Model> {
    let model = vault_performance::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        payout_plan_id: Set(payout_plan_id.to_string()),
        total_amount: Set(200_000),
        progress_percentage: Set(30),
        next_payout_date: Set(None),
        status: Set("active".to_string()),
        created_at: Set(next_created_at()),
    };
    Ok(model.insert(db).await?)
}
