use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use chrono::Utc;
use common::{OauthProvider, RegisterState, ResponseStatus, Role};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::audit::AuditJob;
use crate::entity::{oauth, student_info, user};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthLoginRes, OauthLoginQuery, PostAuthRegisterReq, validate_register_request,
};
use crate::oauth::OauthIdentity;
use crate::response::{Envelope, EnvelopeBody};
use crate::state::AppState;
use crate::utils::jwt;

fn issue_token_pair(state: &AppState, user: &user::Model) -> Result<(String, String), AppError> {
    let auth = &state.config.auth;
    let access = jwt::sign_access(
        user.id,
        user.student_id.as_deref(),
        user.role,
        &auth.jwt_secret,
        auth.access_ttl_minutes,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;
    let refresh = jwt::sign_refresh(
        user.id,
        user.student_id.as_deref(),
        user.role,
        &auth.jwt_secret,
        auth.refresh_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;
    Ok((access, refresh))
}

/// Map a provider identity to a local user, creating an inactive account on
/// first contact. The oauth link row is written by the background audit
/// writer; until it lands, a repeated login simply creates another inactive
/// account the way the source system did.
async fn resolve_user(state: &AppState, identity: OauthIdentity) -> Result<user::Model, AppError> {
    let link = oauth::Entity::find()
        .filter(oauth::Column::Provider.eq(identity.provider))
        .filter(oauth::Column::OauthId.eq(&identity.oauth_id))
        .one(&state.db)
        .await?;

    if let Some(link) = link
        && let Some(user_id) = link.user_id
    {
        return user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or(AppError::NotFoundUser);
    }

    let created = user::ActiveModel {
        student_id: Set(None),
        role: Set(Role::Student),
        register_state: Set(RegisterState::Inactive),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state.audit.enqueue(AuditJob::LinkOauth {
        provider: identity.provider,
        oauth_id: identity.oauth_id,
        user_id: created.id,
    });

    Ok(created)
}

/// OAuth login: exchange the provider code for tokens.
#[utoipa::path(
    get,
    path = "/login/{provider}",
    tag = "Auth",
    operation_id = "getOauthLogin",
    summary = "Log in with an OAuth authorization code",
    description = "Exchanges the provider's authorization code for this service's token \
        pair. An identity seen for the first time gets a fresh inactive account; the \
        caller completes registration separately.",
    params(
        ("provider" = String, Path, description = "OAuth provider: kakao or naver"),
        OauthLoginQuery,
    ),
    responses(
        (status = 200, description = "Token pair", body = EnvelopeBody<AuthLoginRes>),
        (status = 400, description = "Unknown provider (4000)", body = EnvelopeBody<serde_json::Value>),
        (status = 502, description = "Provider call failed (4044)", body = EnvelopeBody<serde_json::Value>),
    ),
)]
#[instrument(skip(state, query), fields(provider = %provider))]
pub async fn get_oauth_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OauthLoginQuery>,
) -> Result<Envelope<AuthLoginRes>, AppError> {
    let provider = OauthProvider::from_str_opt(&provider)
        .ok_or_else(|| AppError::Validation(format!("Unknown provider: {provider}")))?;

    let identity = state
        .oauth
        .fetch_identity(provider, &query.code)
        .await
        .map_err(|e| AppError::Dependency(e.to_string()))?;

    let user = resolve_user(&state, identity).await?;
    let (access_token, refresh_token) = issue_token_pair(&state, &user)?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        AuthLoginRes {
            access_token,
            refresh_token,
            register_state: user.register_state,
            student_id: user.student_id,
        },
    ))
}

/// Link a student identity to the calling account.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "postRegister",
    summary = "Register the caller's student identity",
    description = "Verifies the (student id, name) pair against the enrollment directory \
        and activates the account. If the student id already belongs to another account, \
        the caller's OAuth identities are moved onto it and the temporary account is \
        dropped.",
    request_body = PostAuthRegisterReq,
    responses(
        (status = 200, description = "Activated; fresh token pair", body = EnvelopeBody<AuthLoginRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Not enrolled (4043) or account gone (4041)", body = EnvelopeBody<serde_json::Value>),
        (status = 409, description = "Already registered (4091)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn post_register(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PostAuthRegisterReq>,
) -> Result<Envelope<AuthLoginRes>, AppError> {
    validate_register_request(&payload)?;
    let student_id = payload.student_id.trim().to_string();

    let caller = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFoundUser)?;

    if caller.register_state == RegisterState::Active {
        return Err(AppError::Conflict);
    }

    let enrolled = student_info::Entity::find_by_id(student_id.clone())
        .filter(student_info::Column::Name.eq(payload.name.trim()))
        .one(&state.db)
        .await?
        .is_some();
    if !enrolled {
        return Err(AppError::NotFoundStudent);
    }

    let existing = user::Entity::find()
        .filter(user::Column::StudentId.eq(&student_id))
        .one(&state.db)
        .await?;

    let user = if let Some(existing) = existing {
        // Same student, second identity: move the caller's oauth links to
        // the account that already owns the student id.
        oauth::Entity::update_many()
            .col_expr(oauth::Column::UserId, Expr::value(existing.id))
            .filter(oauth::Column::UserId.eq(caller.id))
            .exec(&state.db)
            .await?;
        user::Entity::delete_by_id(caller.id).exec(&state.db).await?;
        existing
    } else {
        let mut active: user::ActiveModel = caller.into();
        active.student_id = Set(Some(student_id));
        active.register_state = Set(RegisterState::Active);
        active.update(&state.db).await?
    };

    let (access_token, refresh_token) = issue_token_pair(&state, &user)?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        AuthLoginRes {
            access_token,
            refresh_token,
            register_state: user.register_state,
            student_id: user.student_id,
        },
    ))
}

/// Exchange a refresh token for a fresh access token.
#[utoipa::path(
    patch,
    path = "/login",
    tag = "Auth",
    operation_id = "patchLogin",
    summary = "Refresh the access token",
    description = "Verifies the bearer refresh token and returns a new access token \
        alongside the same refresh token.",
    responses(
        (status = 200, description = "Fresh access token", body = EnvelopeBody<AuthLoginRes>),
        (status = 401, description = "Unauthorized (4011)", body = EnvelopeBody<serde_json::Value>),
        (status = 404, description = "Account gone (4041)", body = EnvelopeBody<serde_json::Value>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, headers))]
pub async fn patch_login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Envelope<AuthLoginRes>, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    let claims =
        jwt::verify(token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

    let user = user::Entity::find_by_id(claims.uid)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFoundUser)?;

    let access_token = jwt::sign_access(
        user.id,
        user.student_id.as_deref(),
        user.role,
        &state.config.auth.jwt_secret,
        state.config.auth.access_ttl_minutes,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    Ok(Envelope::new(
        ResponseStatus::Success,
        AuthLoginRes {
            access_token,
            refresh_token: token.to_string(),
            register_state: user.register_state,
            student_id: user.student_id,
        },
    ))
}
