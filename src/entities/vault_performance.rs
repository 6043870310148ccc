//! Vault performance entity - per-plan progress rows for the insights screen.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vault performance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vault_performance")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Plan this row describes
    pub payout_plan_id: String,
    /// Total amount locked into the plan, in naira
    pub total_amount: i64,
    /// Upstream-computed progress, 0-100
    pub progress_percentage: i32,
    /// Next scheduled disbursement date, if any
    pub next_payout_date: Option<Date>,
    /// Plan status as reported by the backend aggregation
    pub status: String,
    /// When the backend computed the row
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `VaultPerformance` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row describes one payout plan
    #[sea_orm(
        belongs_to = "super::payout_plan::Entity",
        from = "Column::PayoutPlanId",
        to = "super::payout_plan::Column::Id"
    )]
    PayoutPlan,
}

impl Related<super::payout_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutPlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
