pub mod connection;
pub mod entities;
pub mod migrations;

pub use connection::*;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use migrations::Migrator;

/// Bring a connection up to the current schema.
pub async fn setup_database(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    Migrator::up(db, None).await
}
