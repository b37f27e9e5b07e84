use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ResponseStatus;
use serde::Serialize;

/// Wire shape of every endpoint outcome: `{code, message, data}`.
///
/// Clients dispatch on `code`; the HTTP status only mirrors the coarse
/// class of the outcome.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EnvelopeBody<T> {
    /// Application status code, e.g. 2000, 2010, 4047.
    #[schema(example = 2000)]
    pub code: u16,
    /// Canonical message for the code.
    #[schema(example = "OK")]
    pub message: &'static str,
    /// Payload; null for data-less outcomes.
    pub data: Option<T>,
}

/// Success-side response wrapper.
pub struct Envelope<T> {
    status: ResponseStatus,
    data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(status: ResponseStatus, data: T) -> Self {
        Self {
            status,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// An envelope carrying only a status, no payload.
    pub fn status(status: ResponseStatus) -> Self {
        Self { status, data: None }
    }
}

/// HTTP status carried alongside an application status code.
pub fn http_status(status: ResponseStatus) -> StatusCode {
    match status {
        ResponseStatus::Success | ResponseStatus::NoDataChanges => StatusCode::OK,
        ResponseStatus::Created | ResponseStatus::Updated => StatusCode::CREATED,
        ResponseStatus::BadRequest
        | ResponseStatus::BadStateRequest
        | ResponseStatus::ExpiredAssignment => StatusCode::BAD_REQUEST,
        ResponseStatus::NotAuthorization => StatusCode::UNAUTHORIZED,
        ResponseStatus::NotAuthentication => StatusCode::FORBIDDEN,
        ResponseStatus::NotFoundUser
        | ResponseStatus::NotFoundStudent
        | ResponseStatus::NotFoundFile
        | ResponseStatus::NotFoundCategory
        | ResponseStatus::NotFoundData => StatusCode::NOT_FOUND,
        ResponseStatus::CantGetResources => StatusCode::BAD_GATEWAY,
        ResponseStatus::ExistData => StatusCode::CONFLICT,
        ResponseStatus::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (
            http_status(self.status),
            Json(EnvelopeBody {
                code: self.status.code(),
                message: self.status.message(),
                data: self.data,
            }),
        )
            .into_response()
    }
}
