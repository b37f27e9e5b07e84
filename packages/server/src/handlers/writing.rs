use axum::extract::{Query, State};
use chrono::Utc;
use common::{ResponseStatus, Role, WritingState};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::instrument;

use crate::audit::AuditJob;
use crate::entity::writing;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::writing::*;
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;
use crate::utils::assignment::{check_submission_window, find_assignment};
use crate::utils::writing::{
    NewWriting, UpsertOutcome, find_writing, update_state_and_score, upsert_writing,
};

/// Student hands a writing in.
#[utoipa::path(
    post,
    path = "/student",
    tag = "Writings",
    operation_id = "studentPostWriting",
    summary = "Submit a writing for an assignment",
    description = "Creates the student's submission for the assignment, or overwrites the \
        existing one. Only the SUBMITTED state is accepted; submissions outside the \
        assignment's date window are rejected. The envelope code distinguishes a first \
        submission (2010) from an overwrite (2011).",
    request_body = StudentPostWritingReq,
    responses(
        (status = 201, description = "Created (2010) or overwritten (2011)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Bad state (4001) or window expired (4090)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Assignment not found (4047)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(assignment_id = payload.assignment_id))]
pub async fn student_post_writing(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StudentPostWritingReq>,
) -> Result<Envelope<()>, AppError> {
    let student_id = auth_user.require_student_id()?.to_string();

    // Parse-or-reject the raw state; students may only hand in.
    let writing_state =
        WritingState::from_value(payload.writing_state).ok_or(AppError::BadStateRequest)?;
    if writing_state != WritingState::Submitted {
        return Err(AppError::BadStateRequest);
    }

    let assignment = find_assignment(&state.db, payload.assignment_id).await?;

    // The window read and the upsert below are separate statements; a
    // concurrent edit of the assignment window can admit a submission
    // checked against the old window.
    check_submission_window(&assignment, Utc::now().date_naive())?;

    let outcome = upsert_writing(
        &state.db,
        NewWriting {
            assignment_id: assignment.id,
            student_id,
            content: payload.content,
            state: writing_state,
            score: assignment.score,
        },
    )
    .await?;

    Ok(Envelope::status(match outcome {
        UpsertOutcome::Inserted => ResponseStatus::Created,
        UpsertOutcome::Updated => ResponseStatus::Updated,
    }))
}

/// Student reads their own submission.
#[utoipa::path(
    get,
    path = "/student",
    tag = "Writings",
    operation_id = "studentGetWriting",
    summary = "Get the caller's submission for an assignment",
    description = "Returns the caller's submission content. A missing submission is not an \
        error; the content is empty.",
    params(StudentGetWritingQuery),
    responses(
        (status = 200, description = "Submission content, possibly empty", body = EnvelopeBody<StudentGetWritingRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(assignment_id = query.assignment_id))]
pub async fn student_get_writing(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StudentGetWritingQuery>,
) -> Result<Envelope<StudentGetWritingRes>, AppError> {
    let student_id = auth_user.require_student_id()?;

    let writing = find_writing(&state.db, query.assignment_id, student_id).await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        StudentGetWritingRes {
            assignment_id: query.assignment_id,
            content: writing.map(|w| w.content).unwrap_or_default(),
        },
    ))
}

/// Student asks the generation service for feedback on a draft.
#[utoipa::path(
    post,
    path = "/student/feedback",
    tag = "Writings",
    operation_id = "studentPostFeedback",
    summary = "Request generated feedback for writing content",
    description = "Synchronously asks the external generation service for feedback on the \
        given content, using the assignment's stored prompt as constraints. The \
        request/response pair is persisted in the background for audit; that write never \
        delays or fails this request.",
    request_body = StudentPostFeedbackReq,
    responses(
        (status = 200, description = "Generated feedback", body = EnvelopeBody<StudentPostFeedbackRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Assignment not found (4047)", body = EnvelopeBody<serde_json::Value>),
        (status = 502, description = "Generation service failed (4044)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(assignment_id = payload.assignment_id))]
pub async fn student_post_feedback(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StudentPostFeedbackReq>,
) -> Result<Envelope<StudentPostFeedbackRes>, AppError> {
    let student_id = auth_user.require_student_id()?.to_string();

    let assignment = find_assignment(&state.db, payload.assignment_id).await?;
    let constraints = assignment.prompt.unwrap_or_default();

    let feedback = state
        .feedback
        .request_feedback(&constraints, &payload.content)
        .await
        .map_err(|e| AppError::Dependency(e.to_string()))?;

    state.audit.enqueue(AuditJob::SaveFeedback {
        student_id,
        request: payload.content,
        response: feedback.clone(),
    });

    Ok(Envelope::new(
        ResponseStatus::Success,
        StudentPostFeedbackRes { feedback },
    ))
}

/// Professor reads one student's submission.
#[utoipa::path(
    get,
    path = "/professor",
    tag = "Writings",
    operation_id = "professorGetWriting",
    summary = "Get one student's submission",
    description = "Returns the student's submission for the assignment; a missing \
        submission renders as the default-empty body.",
    params(ProfessorGetWritingQuery),
    responses(
        (status = 200, description = "Submission, possibly default-empty", body = EnvelopeBody<ProfessorGetWritingRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(assignment_id = query.assignment_id))]
pub async fn professor_get_writing(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProfessorGetWritingQuery>,
) -> Result<Envelope<ProfessorGetWritingRes>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let writing = find_writing(&state.db, query.assignment_id, &query.student_id).await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        writing
            .map(ProfessorGetWritingRes::from)
            .unwrap_or_default(),
    ))
}

/// Professor lists submissions for an assignment.
#[utoipa::path(
    get,
    path = "/professor/list",
    tag = "Writings",
    operation_id = "professorGetWritingList",
    summary = "List submissions for an assignment",
    description = "Returns one page of submissions ordered by state, the total count and \
        the assignment's configured score. Page and count queries run concurrently.",
    params(ProfessorGetWritingListQuery),
    responses(
        (status = 200, description = "Page of submissions", body = EnvelopeBody<ProfessorGetWritingListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Assignment not found (4047)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(assignment_id = query.assignment_id))]
pub async fn professor_get_writing_list(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProfessorGetWritingListQuery>,
) -> Result<Envelope<ProfessorGetWritingListRes>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let page = query.page.unwrap_or(0);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let assignment = find_assignment(&state.db, query.assignment_id).await?;

    let page_fut = writing::Entity::find()
        .filter(writing::Column::AssignmentId.eq(query.assignment_id))
        .order_by_asc(writing::Column::State)
        .order_by_asc(writing::Column::StudentId)
        .offset(Some(page * page_size))
        .limit(Some(page_size))
        .all(&state.db);

    let count_fut = writing::Entity::find()
        .filter(writing::Column::AssignmentId.eq(query.assignment_id))
        .count(&state.db);

    // Scatter-gather; either sub-query's failure fails the whole request.
    let (writings, total_elements) = tokio::try_join!(page_fut, count_fut)?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        ProfessorGetWritingListRes {
            total_elements,
            score: assignment.score,
            writings: writings
                .into_iter()
                .map(ProfessorGetWritingListElementRes::from)
                .collect(),
        },
    ))
}

/// Professor grades a submission.
#[utoipa::path(
    patch,
    path = "/professor",
    tag = "Writings",
    operation_id = "assignmentPatchWriting",
    summary = "Update a submission's state and score",
    description = "Grading update keyed by (assignment, student). A missing submission is \
        a soft outcome (4047), not an error; values a column constraint rejects are \
        reported as a bad state request (4001).",
    request_body = AssignmentPatchWritingReq,
    responses(
        (status = 200, description = "Updated (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Bad state or rejected values (4001)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "No matching submission (4047)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(assignment_id = payload.assignment_id))]
pub async fn assignment_patch_writing(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentPatchWritingReq>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let writing_state =
        WritingState::from_value(payload.writing_state).ok_or(AppError::BadStateRequest)?;

    let rows = update_state_and_score(
        &state.db,
        payload.assignment_id,
        &payload.student_id,
        writing_state,
        payload.score,
    )
    .await?;

    Ok(Envelope::status(if rows > 0 {
        ResponseStatus::Success
    } else {
        ResponseStatus::NotFoundData
    }))
}
