//! Entity module - Contains all SeaORM entity definitions for the backend tables.
//! These entities mirror the hosted Postgres schema the client consumes.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bank_account;
pub mod event;
pub mod payout_plan;
pub mod performance_trend;
pub mod transaction;
pub mod user_metric;
pub mod vault_performance;
pub mod wallet;

// Re-export specific types to avoid conflicts
pub use bank_account::{Column as BankAccountColumn, Entity as BankAccount, Model as BankAccountModel};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use payout_plan::{Column as PayoutPlanColumn, Entity as PayoutPlan, Model as PayoutPlanModel};
pub use performance_trend::{
    Column as PerformanceTrendColumn, Entity as PerformanceTrend, Model as PerformanceTrendModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user_metric::{Column as UserMetricColumn, Entity as UserMetric, Model as UserMetricModel};
pub use vault_performance::{
    Column as VaultPerformanceColumn, Entity as VaultPerformance, Model as VaultPerformanceModel,
};
pub use wallet::{Column as WalletColumn, Entity as Wallet, Model as WalletModel};
