//! Performance trend entity - period-over-period comparisons for insights.
//!
//! `percentage_change` is computed upstream as
//! `(current - previous) / previous * 100` when `previous != 0`; the client
//! displays it and never recomputes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which comparison a trend row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    /// Month-over-month deposit growth
    #[sea_orm(string_value = "monthly_growth")]
    MonthlyGrowth,
    /// Average payout size this period vs last
    #[sea_orm(string_value = "average_payout")]
    AveragePayout,
    /// Scheduled payouts this period vs last
    #[sea_orm(string_value = "upcoming_payouts")]
    UpcomingPayouts,
}

/// Performance trend database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "performance_trends")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Which comparison this row carries
    pub trend_type: TrendType,
    /// Value for the current period
    pub current_value: i64,
    /// Value for the previous period
    pub previous_value: i64,
    /// Upstream-computed percentage change between the two
    pub percentage_change: f64,
    /// First day of the current period
    pub period_start: Date,
    /// Last day of the current period
    pub period_end: Date,
    /// When the backend computed the row
    pub created_at: DateTimeUtc,
}

/// Trends relate to nothing; they are standalone aggregates
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
