use common::WritingState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's writing for one assignment.
///
/// At most one row exists per (assignment_id, student_id); the composite
/// unique index created in `seed::ensure_constraints` backs the upsert in
/// `utils::writing`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "writing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub assignment_id: i32,
    #[sea_orm(belongs_to, from = "assignment_id", to = "id")]
    pub assignment: HasOne<super::assignment::Entity>,

    pub student_id: String,
    pub content: String,
    pub state: WritingState,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub submitted_at: DateTimeUtc,

    /// Defaults to the assignment's score at submission; overwritten by grading.
    pub score: i32,
}

impl ActiveModelBehavior for ActiveModel {}
