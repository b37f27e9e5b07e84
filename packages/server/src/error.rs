use axum::Json;
use axum::response::{IntoResponse, Response};
use common::ResponseStatus;
use sea_orm::DbErr;

use crate::response::{EnvelopeBody, http_status};

/// Application-level error type.
///
/// Every variant renders as a `{code, message, data: null}` envelope; the
/// detail strings are for logs only and never reach the client.
#[derive(Debug)]
pub enum AppError {
    /// Malformed body or parameters.
    Validation(String),
    /// State value outside the accepted set.
    BadStateRequest,
    /// A column constraint rejected the write.
    BadIntegrity,
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    NotFoundUser,
    NotFoundStudent,
    NotFoundFile,
    NotFoundCategory,
    /// Assignment, writing or chat room absent.
    NotFoundData,
    /// Submission attempted outside the assignment window.
    ExpiredAssignment,
    /// A row with the same identity already exists.
    Conflict,
    /// External generation or identity service failed. No retry.
    Dependency(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> ResponseStatus {
        match self {
            AppError::Validation(_) => ResponseStatus::BadRequest,
            AppError::BadStateRequest | AppError::BadIntegrity => ResponseStatus::BadStateRequest,
            AppError::TokenMissing | AppError::TokenInvalid => ResponseStatus::NotAuthorization,
            AppError::PermissionDenied => ResponseStatus::NotAuthentication,
            AppError::NotFoundUser => ResponseStatus::NotFoundUser,
            AppError::NotFoundStudent => ResponseStatus::NotFoundStudent,
            AppError::NotFoundFile => ResponseStatus::NotFoundFile,
            AppError::NotFoundCategory => ResponseStatus::NotFoundCategory,
            AppError::NotFoundData => ResponseStatus::NotFoundData,
            AppError::ExpiredAssignment => ResponseStatus::ExpiredAssignment,
            AppError::Conflict => ResponseStatus::ExistData,
            AppError::Dependency(_) => ResponseStatus::CantGetResources,
            AppError::Internal(_) => ResponseStatus::InternalError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(detail) => tracing::debug!("Validation error: {detail}"),
            AppError::Dependency(detail) => tracing::warn!("Dependency failure: {detail}"),
            AppError::Internal(detail) => tracing::error!("Internal error: {detail}"),
            _ => {}
        }

        let status = self.status();
        (
            http_status(status),
            Json(EnvelopeBody::<()> {
                code: status.code(),
                message: status.message(),
                data: None,
            }),
        )
            .into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
