use axum::extract::{Query, State};
use chrono::Utc;
use common::{ChatState, ResponseStatus, Role};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{chat, chat_room};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::chat::{
    ChatElementRes, ProfChatListElementRes, ProfChatListRes, ProfChatPostReq, ProfChatQuery,
    StudentChatPostReq, validate_comment,
};
use crate::models::shared::PageQuery;
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;

/// Upsert the student's room into the given state.
///
/// Single statement against the room's primary key, so a question racing
/// the room's first creation cannot produce two rooms.
async fn upsert_room(db: &DatabaseConnection, student_id: &str, state: ChatState) -> Result<(), AppError> {
    let room = chat_room::ActiveModel {
        student_id: Set(student_id.to_string()),
        state: Set(state),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    chat_room::Entity::insert(room)
        .on_conflict(
            OnConflict::column(chat_room::Column::StudentId)
                .update_column(chat_room::Column::State)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Move an existing room into the given state; 0 rows means no room.
async fn update_room_state(
    db: &DatabaseConnection,
    student_id: &str,
    state: ChatState,
) -> Result<u64, AppError> {
    let result = chat_room::Entity::update_many()
        .col_expr(chat_room::Column::State, Expr::value(state))
        .filter(chat_room::Column::StudentId.eq(student_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

async fn insert_chat(
    db: &DatabaseConnection,
    student_id: &str,
    comment: String,
    is_question: bool,
) -> Result<(), AppError> {
    let message = chat::ActiveModel {
        chat_room_id: Set(student_id.to_string()),
        comment: Set(comment),
        is_question: Set(is_question),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    message.insert(db).await?;
    Ok(())
}

async fn thread_for(db: &DatabaseConnection, student_id: &str) -> Result<Vec<ChatElementRes>, AppError> {
    let chats = chat::Entity::find()
        .filter(chat::Column::ChatRoomId.eq(student_id))
        .order_by_asc(chat::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(chats.into_iter().map(ChatElementRes::from).collect())
}

/// Student asks the professor a question.
#[utoipa::path(
    post,
    path = "/student",
    tag = "Chat",
    operation_id = "studentPostChat",
    summary = "Post a question to the professor",
    description = "Creates the student's chat room if needed, marks it waiting and appends \
        the question.",
    request_body = StudentChatPostReq,
    responses(
        (status = 200, description = "Question recorded (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Validation error (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn student_post_chat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StudentChatPostReq>,
) -> Result<Envelope<()>, AppError> {
    let student_id = auth_user.require_student_id()?.to_string();
    validate_comment(&payload.question)?;

    upsert_room(&state.db, &student_id, ChatState::Waiting).await?;
    insert_chat(&state.db, &student_id, payload.question, true).await?;

    Ok(Envelope::status(ResponseStatus::Success))
}

/// Student reads their own thread.
#[utoipa::path(
    get,
    path = "/student",
    tag = "Chat",
    operation_id = "studentGetChat",
    summary = "Get the caller's thread",
    responses(
        (status = 200, description = "Messages, oldest first", body = EnvelopeBody<Vec<ChatElementRes>>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn student_get_chat(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Envelope<Vec<ChatElementRes>>, AppError> {
    let student_id = auth_user.require_student_id()?;
    let thread = thread_for(&state.db, student_id).await?;
    Ok(Envelope::new(ResponseStatus::Success, thread))
}

/// Professor reads a student's thread; opening it marks the room read.
#[utoipa::path(
    get,
    path = "/prof",
    tag = "Chat",
    operation_id = "profGetChat",
    summary = "Get a student's thread",
    description = "Returns the student's messages and marks the room as opened. A student \
        with no room yields an empty thread.",
    params(ProfChatQuery),
    responses(
        (status = 200, description = "Messages, oldest first", body = EnvelopeBody<Vec<ChatElementRes>>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn prof_get_chat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProfChatQuery>,
) -> Result<Envelope<Vec<ChatElementRes>>, AppError> {
    auth_user.require_role(Role::Professor)?;

    update_room_state(&state.db, &query.student_id, ChatState::Confirmation).await?;
    let thread = thread_for(&state.db, &query.student_id).await?;

    Ok(Envelope::new(ResponseStatus::Success, thread))
}

/// Professor lists rooms, unanswered first.
#[utoipa::path(
    get,
    path = "/prof/list",
    tag = "Chat",
    operation_id = "profGetChatList",
    summary = "List chat rooms",
    description = "One page of rooms ordered by state, waiting first, with the total \
        count. Page and count queries run concurrently.",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of rooms", body = EnvelopeBody<ProfChatListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn prof_get_chat_list(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Envelope<ProfChatListRes>, AppError> {
    auth_user.require_role(Role::Professor)?;
    let (page, page_size) = query.normalize();

    let page_fut = chat_room::Entity::find()
        .order_by_asc(chat_room::Column::State)
        .order_by_asc(chat_room::Column::StudentId)
        .offset(Some(page * page_size))
        .limit(Some(page_size))
        .all(&state.db);

    let count_fut = chat_room::Entity::find().count(&state.db);

    let (rooms, total_elements) = tokio::try_join!(page_fut, count_fut)?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        ProfChatListRes {
            total_elements,
            chat_list: rooms.into_iter().map(ProfChatListElementRes::from).collect(),
        },
    ))
}

/// Professor answers a student.
#[utoipa::path(
    post,
    path = "/prof",
    tag = "Chat",
    operation_id = "profPostChat",
    summary = "Answer a student",
    description = "Appends the answer to the student's thread and marks the room complete. \
        The room must already exist.",
    request_body = ProfChatPostReq,
    responses(
        (status = 200, description = "Answer recorded (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Validation error (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "No room for the student (4043)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn prof_post_chat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ProfChatPostReq>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;
    validate_comment(&payload.comment)?;

    let rows = update_room_state(&state.db, &payload.student_id, ChatState::Complete).await?;
    if rows == 0 {
        return Err(AppError::NotFoundStudent);
    }

    insert_chat(&state.db, &payload.student_id, payload.comment, false).await?;

    Ok(Envelope::status(ResponseStatus::Success))
}

/// Mark a student's room as handled.
#[utoipa::path(
    patch,
    path = "/prof",
    tag = "Chat",
    operation_id = "profPatchChat",
    summary = "Mark a room complete",
    params(ProfChatQuery),
    responses(
        (status = 200, description = "Marked complete (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "No room for the student (4043)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn prof_patch_chat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProfChatQuery>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let rows = update_room_state(&state.db, &query.student_id, ChatState::Complete).await?;
    if rows == 0 {
        return Err(AppError::NotFoundStudent);
    }

    Ok(Envelope::status(ResponseStatus::Success))
}
