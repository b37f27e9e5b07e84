use chrono::Utc;
use common::WritingState;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    Statement,
};

use crate::entity::writing;
use crate::error::AppError;

/// Column values for a submission about to be upserted.
pub struct NewWriting {
    pub assignment_id: i32,
    pub student_id: String,
    pub content: String,
    pub state: WritingState,
    pub score: i32,
}

/// Which branch of the upsert fired. Both are success outcomes; callers
/// only distinguish them for the envelope code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Insert-or-overwrite the one writing row for (assignment, student).
///
/// A single statement targeting the composite unique index, so concurrent
/// identical submissions cannot produce two rows. `created_at` survives an
/// overwrite; the other columns take the new values. Postgres reports
/// rows_affected=1 for both `ON CONFLICT` branches, so the statement returns
/// `xmax = 0` (true only for a freshly inserted row) to tell them apart.
pub async fn upsert_writing(
    db: &DatabaseConnection,
    writing: NewWriting,
) -> Result<UpsertOutcome, AppError> {
    let now = Utc::now();

    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        INSERT INTO writing
            (assignment_id, student_id, content, state, created_at, updated_at, submitted_at, score)
        VALUES ($1, $2, $3, $4, $5, $5, $5, $6)
        ON CONFLICT (assignment_id, student_id) DO UPDATE
        SET content = EXCLUDED.content,
            state = EXCLUDED.state,
            updated_at = EXCLUDED.updated_at,
            submitted_at = EXCLUDED.submitted_at,
            score = EXCLUDED.score
        RETURNING (xmax = 0) AS inserted
        "#,
        [
            writing.assignment_id.into(),
            writing.student_id.into(),
            writing.content.into(),
            writing.state.value().into(),
            now.into(),
            writing.score.into(),
        ],
    );

    let row = db
        .query_one_raw(stmt)
        .await?
        .ok_or_else(|| AppError::Internal("Writing upsert returned no row".into()))?;
    let inserted: bool = row.try_get("", "inserted")?;

    Ok(if inserted {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Updated
    })
}

/// Professor-side grading update.
///
/// Returns the number of matched rows; zero means no submission exists for
/// the pair and is a soft outcome, not an error. A column-constraint
/// rejection of the new values is reported as `BadIntegrity` instead of
/// propagating raw.
pub async fn update_state_and_score(
    db: &DatabaseConnection,
    assignment_id: i32,
    student_id: &str,
    state: WritingState,
    score: i32,
) -> Result<u64, AppError> {
    let result = writing::Entity::update_many()
        .col_expr(writing::Column::State, Expr::value(state))
        .col_expr(writing::Column::Score, Expr::value(score))
        .col_expr(writing::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(writing::Column::AssignmentId.eq(assignment_id))
        .filter(writing::Column::StudentId.eq(student_id))
        .exec(db)
        .await;

    match result {
        Ok(res) => Ok(res.rows_affected),
        Err(e) => {
            // sql_err() surfaces unique/FK violations; a check-constraint
            // rejection only shows up in the driver message.
            if e.sql_err().is_some() || e.to_string().contains("violates check constraint") {
                Err(AppError::BadIntegrity)
            } else {
                Err(e.into())
            }
        }
    }
}

/// Point lookup; absent is not an error here, callers decide how to render it.
pub async fn find_writing(
    db: &DatabaseConnection,
    assignment_id: i32,
    student_id: &str,
) -> Result<Option<writing::Model>, AppError> {
    let found = writing::Entity::find()
        .filter(writing::Column::AssignmentId.eq(assignment_id))
        .filter(writing::Column::StudentId.eq(student_id))
        .one(db)
        .await?;
    Ok(found)
}
