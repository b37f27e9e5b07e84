use chrono::NaiveDate;
use sea_orm::EntityTrait;

use crate::entity::assignment;
use crate::error::AppError;

/// Look up an assignment by ID or return the data-missing envelope.
pub async fn find_assignment<C: sea_orm::ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<assignment::Model, AppError> {
    assignment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFoundData)
}

/// Check that `today` falls inside the assignment's submission window.
/// The window is inclusive on both ends.
pub fn check_submission_window(
    assignment: &assignment::Model,
    today: NaiveDate,
) -> Result<(), AppError> {
    if today < assignment.start_date || today > assignment.end_date {
        return Err(AppError::ExpiredAssignment);
    }
    Ok(())
}
