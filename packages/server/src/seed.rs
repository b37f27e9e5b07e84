use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{oauth, writing};

/// Ensure the constraints the workflows rely on exist.
///
/// The composite unique index on writing(assignment_id, student_id) is the
/// arbiter for the submission upsert: without it, `ON CONFLICT` has nothing
/// to target and concurrent submissions could produce duplicate rows.
pub async fn ensure_constraints(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_writing_assignment_student")
        .table(writing::Entity)
        .col(writing::Column::AssignmentId)
        .col(writing::Column::StudentId)
        .unique()
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_writing_assignment_student exists"),
        Err(e) => {
            tracing::warn!("Failed to create index idx_writing_assignment_student: {}", e);
        }
    }

    // One link row per provider-side identity.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_oauth_provider_subject")
        .table(oauth::Entity)
        .col(oauth::Column::Provider)
        .col(oauth::Column::OauthId)
        .unique()
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_oauth_provider_subject exists"),
        Err(e) => {
            tracing::warn!("Failed to create index idx_oauth_provider_subject: {}", e);
        }
    }

    // Grading must not write negative scores; violations surface as a
    // constraint error that the gateway reports softly.
    let stmt = r#"
        DO $$ BEGIN
            ALTER TABLE writing ADD CONSTRAINT chk_writing_score CHECK (score >= 0);
        EXCEPTION WHEN duplicate_object OR duplicate_table THEN NULL;
        END $$
    "#;

    match db.execute_unprepared(stmt).await {
        Ok(_) => info!("Ensured constraint chk_writing_score exists"),
        Err(e) => {
            tracing::warn!("Failed to create constraint chk_writing_score: {}", e);
        }
    }

    Ok(())
}
