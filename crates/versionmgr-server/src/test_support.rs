use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with every migration applied.
pub(crate) async fn test_db() -> DatabaseConnection {
    // One connection: each new sqlite memory connection is its own database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("failed to open in-memory sqlite");
    versionmgr_migration::Migrator::up(&db, None)
        .await
        .expect("failed to apply migrations");
    db
}
