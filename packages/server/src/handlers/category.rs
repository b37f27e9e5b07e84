use axum::extract::{Path, State};
use chrono::Utc;
use common::{ResponseStatus, Role};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::category;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::category::{
    CategoryGetListRes, CategoryPostReq, CategoryPutReq, CategoryRes, validate_category_name,
};
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;

/// Professor creates a file category.
#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "postCategory",
    summary = "Create a category",
    request_body = CategoryPostReq,
    responses(
        (status = 201, description = "Category created (2010)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Validation error (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 409, description = "Name already exists (4091)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn post_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryPostReq>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;
    validate_category_name(&payload.name)?;

    let new_category = category::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    new_category
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict,
            _ => AppError::from(e),
        })?;

    Ok(Envelope::status(ResponseStatus::Created))
}

/// Rename a category.
#[utoipa::path(
    put,
    path = "/",
    tag = "Categories",
    operation_id = "putCategory",
    summary = "Rename a category",
    request_body = CategoryPutReq,
    responses(
        (status = 200, description = "Renamed (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 400, description = "Validation error (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Category not found (4046)", body = EnvelopeBody<serde_json::Value>),
        (status = 409, description = "Name already exists (4091)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn put_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryPutReq>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;
    validate_category_name(&payload.name)?;

    let result = category::Entity::update_many()
        .col_expr(
            category::Column::Name,
            Expr::value(payload.name.trim().to_string()),
        )
        .filter(category::Column::Id.eq(payload.id))
        .exec(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict,
            _ => AppError::from(e),
        })?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFoundCategory);
    }

    Ok(Envelope::status(ResponseStatus::Success))
}

/// Delete a category.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted (2000)", body = EnvelopeBody<serde_json::Value>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 403, description = "Not a professor (4012)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Category not found (4046)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(category_id = %id))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Envelope<()>, AppError> {
    auth_user.require_role(Role::Professor)?;

    let result = category::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFoundCategory);
    }

    Ok(Envelope::status(ResponseStatus::Success))
}

/// All categories, name-ordered.
#[utoipa::path(
    get,
    path = "/list",
    tag = "Categories",
    operation_id = "getCategoryList",
    summary = "List categories",
    responses(
        (status = 200, description = "All categories", body = EnvelopeBody<CategoryGetListRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_category_list(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Envelope<CategoryGetListRes>, AppError> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        CategoryGetListRes {
            categories: categories.into_iter().map(CategoryRes::from).collect(),
        },
    ))
}
