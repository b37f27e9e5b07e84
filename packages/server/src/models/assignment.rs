use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::assignment;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AssignmentPostReq {
    #[schema(example = "Week 1 assignment")]
    pub title: String,
    #[schema(example = "Write about artificial intelligence")]
    pub description: String,
    #[schema(example = 10)]
    pub score: i32,
    #[schema(example = "2024-08-05")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-08-06")]
    pub end_date: NaiveDate,
    /// Constraints handed to the generation service on feedback requests.
    pub prompt: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentGetListElementRes {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Week 1 assignment")]
    pub title: String,
    #[schema(example = "Write about artificial intelligence")]
    pub description: String,
    #[schema(example = 10)]
    pub score: i32,
    #[schema(example = "2024-08-05")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-08-06")]
    pub end_date: NaiveDate,
}

impl From<assignment::Model> for AssignmentGetListElementRes {
    fn from(a: assignment::Model) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            score: a.score,
            start_date: a.start_date,
            end_date: a.end_date,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentGetListRes {
    pub assignments: Vec<AssignmentGetListElementRes>,
}

pub fn validate_assignment_post(req: &AssignmentPostReq) -> Result<(), AppError> {
    let title = req.title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    if req.score < 0 {
        return Err(AppError::Validation("Score must be >= 0".into()));
    }
    if req.end_date < req.start_date {
        return Err(AppError::Validation(
            "End date must not precede start date".into(),
        ));
    }
    Ok(())
}
