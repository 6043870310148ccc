//! User metric entity - daily aggregate figures for the insights screen.
//!
//! The backend's `refresh_insights_data` routine recomputes one row per
//! `(user, metric_type, metric_date)`; the client reads today's rows only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which aggregate a metric row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Total amount paid out across all plans
    #[sea_orm(string_value = "payouts")]
    Payouts,
    /// Total amount deposited
    #[sea_orm(string_value = "deposits")]
    Deposits,
    /// Number of currently active plans
    #[sea_orm(string_value = "active_plans")]
    ActivePlans,
    /// Number of transactions on record
    #[sea_orm(string_value = "transactions")]
    Transactions,
}

/// User metric database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_metrics")]
pub struct Model {
    /// Unique identifier; the backend derives it from `(user, type, date)`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Which aggregate this row carries
    pub metric_type: MetricType,
    /// Aggregate value (naira for amounts, a plain count otherwise)
    pub metric_value: i64,
    /// Day the aggregate describes
    pub metric_date: Date,
}

/// Metrics relate to nothing; they are standalone aggregates
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
