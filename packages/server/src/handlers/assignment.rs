use axum::extract::State;
use chrono::Utc;
use common::{ResponseStatus, Role};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use tracing::instrument;

use crate::entity::assignment;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::assignment::{
    AssignmentGetListElementRes, AssignmentGetListRes, AssignmentPostReq, validate_assignment_post,
};
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;

/// Professor creates an assignment.
#[utoipa::path(
    post,
    path = "/",
    tag = "Assignments",
    operation_id = "postAssignment",
    summary = "Create an assignment",
    request_body = AssignmentPostReq,
    responses(
        (status = 201, description = "Assignment created (2010)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Validation error (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn post_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentPostReq>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;
    validate_assignment_post(&payload)?;

    let new_assignment = assignment::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        score: Set(payload.score),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        prompt: Set(payload.prompt),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_assignment.insert(&state.db).await?;

    Ok(Envelope::status(ResponseStatus::Created))
}

/// List every assignment, oldest first.
#[utoipa::path(
    get,
    path = "/list",
    tag = "Assignments",
    operation_id = "getAssignmentList",
    summary = "List assignments",
    responses(
        (status = 200, description = "All assignments", body = EnvelopeBody<AssignmentGetListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_assignment_list(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Envelope<AssignmentGetListRes>, AppError> {
    let assignments = assignment::Entity::find()
        .order_by_asc(assignment::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        AssignmentGetListRes {
            assignments: assignments
                .into_iter()
                .map(AssignmentGetListElementRes::from)
                .collect(),
        },
    ))
}
