//! Bank account entity - destination accounts for payouts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bank account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Bank display name (e.g. "GTBank")
    pub bank_name: String,
    /// Account number, stored as given by the user
    pub account_number: String,
}

/// Defines relationships between `BankAccount` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account receives payouts from many plans
    #[sea_orm(has_many = "super::payout_plan::Entity")]
    PayoutPlans,
}

impl Related<super::payout_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
