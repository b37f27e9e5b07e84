use axum::extract::{Query, State};
use common::{RegisterState, ResponseStatus, Role};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{PageQuery, escape_like};
use crate::models::user::{GetUserListRes, GetUserRes, PutUserReq, UserSearchQuery};
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;

/// Registered users ordered by student id.
#[utoipa::path(
    get,
    path = "/list",
    tag = "Users",
    operation_id = "getUserList",
    summary = "List registered users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users", body = EnvelopeBody<GetUserListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn get_user_list(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Envelope<GetUserListRes>, AppError> {
    auth_user.require_role(Role::Professor)?;
    let (page, page_size) = query.normalize();

    let base = user::Entity::find().filter(user::Column::StudentId.is_not_null());

    let total_elements = base.clone().count(&state.db).await?;
    let users = base
        .order_by_asc(user::Column::StudentId)
        .offset(Some(page * page_size))
        .limit(Some(page_size))
        .all(&state.db)
        .await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        GetUserListRes {
            users: users.into_iter().map(GetUserRes::from).collect(),
            total_elements,
        },
    ))
}

/// Search users by student id fragment.
#[utoipa::path(
    get,
    path = "/search",
    tag = "Users",
    operation_id = "getUserSearch",
    summary = "Search users by student id",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = EnvelopeBody<GetUserListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn get_user_search(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<Envelope<GetUserListRes>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let page = query.page.unwrap_or(0);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let pattern = format!("%{}%", escape_like(query.student_id.trim()));
    let base = user::Entity::find().filter(user::Column::StudentId.like(&pattern));

    let total_elements = base.clone().count(&state.db).await?;
    let users = base
        .order_by_asc(user::Column::StudentId)
        .offset(Some(page * page_size))
        .limit(Some(page_size))
        .all(&state.db)
        .await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        GetUserListRes {
            users: users.into_iter().map(GetUserRes::from).collect(),
            total_elements,
        },
    ))
}

/// Admin update of role, register state or student id.
#[utoipa::path(
    put,
    path = "/",
    tag = "Users",
    operation_id = "putUser",
    summary = "Update a user by student id",
    description = "Updates role and register state, optionally renumbering the student id. \
        Matching no row is the no-change outcome (2001), not an error.",
    request_body = PutUserReq,
    responses(
        (status = 200, description = "Updated (2000) or no change (2001)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Bad enum value (4001)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not an admin (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 409, description = "Student id taken (4091)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn put_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PutUserReq>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let role = Role::from_value(payload.role).ok_or(AppError::BadStateRequest)?;
    let register_state =
        RegisterState::from_value(payload.register_state).ok_or(AppError::BadStateRequest)?;

    let mut update = user::Entity::update_many()
        .col_expr(user::Column::Role, Expr::value(role))
        .col_expr(user::Column::RegisterState, Expr::value(register_state))
        .filter(user::Column::StudentId.eq(payload.student_id.as_str()));

    if let Some(new_student_id) = &payload.new_student_id {
        update = update.col_expr(user::Column::StudentId, Expr::value(new_student_id.clone()));
    }

    let result = update.exec(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict,
        _ => AppError::from(e),
    })?;

    Ok(Envelope::status(if result.rows_affected > 0 {
        ResponseStatus::Success
    } else {
        ResponseStatus::NoDataChanges
    }))
}
