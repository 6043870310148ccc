//! Event entity - Represents notification records surfaced to the user.
//!
//! Events are created by backend-side triggers when something happens to the
//! user's money (a payout completes, a vault is created, a disbursement fails).
//! The client never creates events; it only reads them and flips their read
//! status. `status` moves `unread -> read` exactly once and is never reversed
//! locally.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of state change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A scheduled payout was disbursed successfully
    #[sea_orm(string_value = "payout_completed")]
    PayoutCompleted,
    /// A payout has been scheduled for a future date
    #[sea_orm(string_value = "payout_scheduled")]
    PayoutScheduled,
    /// A new vault (payout plan) was created
    #[sea_orm(string_value = "vault_created")]
    VaultCreated,
    /// A disbursement attempt failed
    #[sea_orm(string_value = "disbursement_failed")]
    DisbursementFailed,
    /// Something security-relevant happened on the account
    #[sea_orm(string_value = "security_alert")]
    SecurityAlert,
}

/// Read state of an event. Transitions only `Unread -> Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Not yet acknowledged by the user
    #[sea_orm(string_value = "unread")]
    Unread,
    /// Acknowledged; counts toward nothing
    #[sea_orm(string_value = "read")]
    Read,
}

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier (UUID string, assigned by the backend)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user's id; every query and subscription is scoped to this
    pub user_id: String,
    /// Kind of state change this event describes
    pub event_type: EventType,
    /// Short human-readable headline
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Read state, flipped by explicit mark-as-read only
    pub status: EventStatus,
    /// Payout plan this event relates to, if any
    pub payout_plan_id: Option<String>,
    /// Transaction this event relates to, if any
    pub transaction_id: Option<String>,
    /// When the backend created the event
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each event optionally references one payout plan
    #[sea_orm(
        belongs_to = "super::payout_plan::Entity",
        from = "Column::PayoutPlanId",
        to = "super::payout_plan::Column::Id"
    )]
    PayoutPlan,
    /// Each event optionally references one transaction
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id"
    )]
    Transaction,
}

impl Related<super::payout_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutPlan.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
