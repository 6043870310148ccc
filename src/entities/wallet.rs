//! Wallet entity - the user's available and locked balances.
//!
//! `locked_balance` is money committed to active payout plans; it leaves the
//! available balance when a vault is funded and returns via payouts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet database model, one row per user
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id
    pub user_id: String,
    /// Spendable balance, in naira
    pub balance: i64,
    /// Balance locked into payout plans, in naira
    pub locked_balance: i64,
}

/// Wallets stand alone; plans reference the user, not the wallet
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
