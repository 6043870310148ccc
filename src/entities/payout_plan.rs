//! Payout plan ("vault") entity - a scheduled disbursement plan.
//!
//! A plan splits `total_amount` into `duration` periodic payouts of
//! `payout_amount`. Invariants enforced by the backend and relied on here:
//! `completed_payouts <= duration`, and a `Completed` plan has
//! `completed_payouts == duration`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a payout plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Disbursing on schedule
    #[sea_orm(string_value = "active")]
    Active,
    /// Temporarily suspended by the user
    #[sea_orm(string_value = "paused")]
    Paused,
    /// Every scheduled payout has been disbursed
    #[sea_orm(string_value = "completed")]
    Completed,
    /// A disbursement failed and the plan stopped
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Created but not yet funded
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// How often a plan disburses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PlanFrequency {
    /// Every week
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Every two weeks
    #[sea_orm(string_value = "biweekly")]
    Biweekly,
    /// Every month
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

/// Payout plan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payout_plans")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Human-readable plan name (e.g. "Monthly Salary Vault")
    pub name: String,
    /// Lifecycle state
    pub status: PlanStatus,
    /// Total amount locked into the plan, in naira
    pub total_amount: i64,
    /// Amount disbursed per payout, in naira
    pub payout_amount: i64,
    /// Total number of scheduled payouts
    pub duration: i32,
    /// Number of payouts already disbursed
    pub completed_payouts: i32,
    /// Disbursement cadence
    pub frequency: PlanFrequency,
    /// Next scheduled disbursement date, if the plan is still running
    pub next_payout_date: Option<Date>,
    /// Bank account payouts are sent to
    pub bank_account_id: Option<String>,
    /// When the plan was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PayoutPlan` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One plan has many events
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
    /// Payouts land in one bank account
    #[sea_orm(
        belongs_to = "super::bank_account::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_account::Column::Id"
    )]
    BankAccount,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::bank_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
