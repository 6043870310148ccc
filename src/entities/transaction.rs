//! Transaction entity - money movements on the user's wallet.
//!
//! Deposits add funds, payouts disburse them. Events reference transactions so
//! the notification detail view can show the amount and outcome.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Funds added to the wallet
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Funds disbursed from a payout plan
    #[sea_orm(string_value = "payout")]
    Payout,
}

/// Processing state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Accepted but not yet processed
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Processing is underway
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Settled successfully
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Processing failed
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Amount moved, in naira (always positive; direction is the type)
    pub amount: i64,
    /// Processing state
    pub status: TransactionStatus,
    /// Direction of the movement
    pub transaction_type: TransactionType,
    /// Payout plan this transaction belongs to, if any
    pub payout_plan_id: Option<String>,
    /// When the backend created the transaction
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One transaction has many events referencing it
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
