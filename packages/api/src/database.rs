use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connect to the database and sync the entity schema.
///
/// In-memory SQLite (used by the test suites) must run on a single pooled
/// connection that never idles out, or the database vanishes mid-test.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    if db_url.starts_with("sqlite") {
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8));
    } else {
        opt.max_connections(20)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .sqlx_logging(true);
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("api::entity::*").sync(&db).await?;

    Ok(db)
}
