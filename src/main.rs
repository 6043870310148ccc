//! Planmoni account summary.
//!
//! Connects to the configured backend (or runs in mock mode), loads every
//! store for the user named by `PLANMONI_USER_ID`, and logs a one-shot
//! summary: balances, unread notifications, plan aggregates, and today's
//! metrics.

use dotenvy::dotenv;
use planmoni::{
    backend::BackendClient,
    config::app::AppConfig,
    core::{
        format::{calculate_progress, format_currency},
        session::{AppState, Session},
    },
    entities::user_metric::MetricType,
    errors::Result,
};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Env vars can also be set externally, so a missing .env is fine
    dotenv().ok();

    let config = AppConfig::load();
    let backend = BackendClient::connect(&config).await?;
    if !backend.is_connected() {
        warn!("running against the mock backend; all collections will be empty");
    }

    let Ok(user_id) = env::var("PLANMONI_USER_ID") else {
        info!("PLANMONI_USER_ID not set; nothing to summarize");
        return Ok(());
    };
    let email = env::var("PLANMONI_USER_EMAIL").ok();

    let mut state = AppState::new();
    let stores = state.sign_in(Session::new(user_id, email), &backend);

    stores.balance.load(&backend).await;
    stores.events.load(&backend).await;
    stores.payouts.load(&backend).await;
    stores.insights.load(&backend).await;

    let show = stores.balance.show_balances();
    info!(
        balance = %stores.balance.display_balance(),
        locked = %stores.balance.display_locked_balance(),
        "wallet"
    );

    if let Some(error) = stores.events.error() {
        warn!(error, "events failed to load");
    } else {
        info!(
            total = stores.events.events().len(),
            unread = stores.events.unread_count(),
            "notifications"
        );
    }

    info!(
        active = stores.payouts.active_plans().len(),
        paid_out = %format_currency(stores.payouts.total_paid_out(), show),
        pending = %format_currency(stores.payouts.pending_payouts(), show),
        completion_rate = stores.payouts.completion_rate(),
        "payout plans"
    );
    for plan in stores.payouts.active_plans() {
        info!(
            name = %plan.name,
            progress = calculate_progress(
                i64::from(plan.completed_payouts),
                i64::from(plan.duration)
            ),
            "plan progress"
        );
    }

    if let Some(error) = stores.insights.error() {
        warn!(error, "insights unavailable");
    } else {
        info!(
            payouts = stores.insights.metric(MetricType::Payouts).unwrap_or(0),
            deposits = stores.insights.metric(MetricType::Deposits).unwrap_or(0),
            active_plans = stores.insights.metric(MetricType::ActivePlans).unwrap_or(0),
            transactions = stores.insights.metric(MetricType::Transactions).unwrap_or(0),
            "today's metrics"
        );
    }

    Ok(())
}
