//! Schema creation from entity definitions.
//!
//! The hosted backend owns the real Postgres schema; this module exists so
//! tests and local development can stand up an equivalent `SQLite` database
//! from the same entity definitions, using `SeaORM`'s
//! `Schema::create_table_from_entity`. No manual SQL is maintained.

use crate::entities::{
    BankAccount, Event, PayoutPlan, PerformanceTrend, Transaction, UserMetric, VaultPerformance,
    Wallet,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

/// Creates every table the client reads, derived from the entity models.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Event)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PayoutPlan)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Transaction)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(BankAccount)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Wallet)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(UserMetric)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PerformanceTrend)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(VaultPerformance)))
        .await?;

    Ok(())
}
