use anyhow::Result;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector,
    sqlx::sqlite::SqlitePoolOptions,
};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// Create a SeaORM connection.
///
/// In-memory SQLite databases live and die with a single connection, so for
/// those URLs the pool holds exactly one connection that is never retired.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    if database_url.starts_with("sqlite") && database_url.contains(":memory:") {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connect(database_url)
            .await?;
        return Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool));
    }

    let conn = Database::connect(ConnectOptions::new(database_url.to_owned())).await?;
    Ok(conn)
}

/// Apply every pending schema migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}
