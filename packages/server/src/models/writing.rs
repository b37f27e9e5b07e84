use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::writing;

/// Request body for a student handing in a writing.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct StudentPostWritingReq {
    /// Assignment being submitted to.
    #[schema(example = 1)]
    pub assignment_id: i32,
    /// Requested state as its raw wire value. Only SUBMITTED (1) is accepted.
    #[schema(example = 1)]
    pub writing_state: i16,
    /// The writing itself.
    #[schema(example = "My essay about AI ...")]
    pub content: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct StudentGetWritingQuery {
    #[param(example = 1)]
    pub assignment_id: i32,
}

/// A student's own view of their submission. Absent submissions render as
/// empty content rather than an error.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentGetWritingRes {
    #[schema(example = 1)]
    pub assignment_id: i32,
    #[schema(example = "My essay about AI ...")]
    pub content: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct StudentPostFeedbackReq {
    #[schema(example = 1)]
    pub assignment_id: i32,
    /// Content to request feedback on; not required to be submitted yet.
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentPostFeedbackRes {
    /// Text produced by the generation service.
    pub feedback: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProfessorGetWritingQuery {
    #[param(example = 1)]
    pub assignment_id: i32,
    #[param(example = "2021111222")]
    pub student_id: String,
}

/// Professor's view of one submission; default-empty when nothing was
/// handed in.
#[derive(Serialize, Default, utoipa::ToSchema)]
pub struct ProfessorGetWritingRes {
    pub content: String,
    #[schema(example = 10)]
    pub score: i32,
    pub created_at: Option<DateTime<Utc>>,
    /// Raw state value; 0 when no submission exists.
    #[schema(example = 1)]
    pub writing_state: i16,
}

impl From<writing::Model> for ProfessorGetWritingRes {
    fn from(w: writing::Model) -> Self {
        Self {
            content: w.content,
            score: w.score,
            created_at: Some(w.created_at),
            writing_state: w.state.value(),
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProfessorGetWritingListQuery {
    #[param(example = 1)]
    pub assignment_id: i32,
    #[param(example = 0)]
    pub page: Option<u64>,
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfessorGetWritingListElementRes {
    #[schema(example = "2021111222")]
    pub student_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = 1)]
    pub writing_state: i16,
    #[schema(example = 10)]
    pub writing_score: i32,
}

impl From<writing::Model> for ProfessorGetWritingListElementRes {
    fn from(w: writing::Model) -> Self {
        Self {
            student_id: w.student_id,
            created_at: w.created_at,
            updated_at: w.updated_at,
            writing_state: w.state.value(),
            writing_score: w.score,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfessorGetWritingListRes {
    /// Total matching submissions across all pages.
    #[schema(example = 47)]
    pub total_elements: u64,
    /// The assignment's configured maximum score.
    #[schema(example = 10)]
    pub score: i32,
    pub writings: Vec<ProfessorGetWritingListElementRes>,
}

/// Grading request; state arrives as its raw wire value.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AssignmentPatchWritingReq {
    #[schema(example = 1)]
    pub assignment_id: i32,
    #[schema(example = "2021111222")]
    pub student_id: String,
    #[schema(example = 2)]
    pub writing_state: i16,
    #[schema(example = 8)]
    pub score: i32,
}
