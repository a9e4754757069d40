use sea_orm::sea_query::{Index, MysqlQueryBuilder, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::submission;

/// Create indexes that schema sync does not cover.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // One submission row per (assignment, user): the coordinator checks this
    // before writing, the index backs it up against races.
    let mut stmt = Index::create();
    stmt.if_not_exists()
        .unique()
        .name("idx_submission_assignment_user")
        .table(submission::Entity)
        .col(submission::Column::AssignmentId)
        .col(submission::Column::UserUuid);

    let sql = match db.get_database_backend() {
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        DatabaseBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        _ => stmt.to_string(PostgresQueryBuilder),
    };

    match db.execute_unprepared(&sql).await {
        Ok(_) => {
            info!("Ensured index idx_submission_assignment_user exists");
        }
        Err(e) => {
            tracing::warn!(
                "Failed to create index idx_submission_assignment_user: {}",
                e
            );
        }
    }

    Ok(())
}
