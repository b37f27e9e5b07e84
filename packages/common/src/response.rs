use serde::{Deserialize, Serialize};

/// Application-level outcome of a request.
///
/// Every endpoint wraps its result as `{code, message, data}` and clients
/// switch on `code`, not on the HTTP status alone. The numeric codes form a
/// small closed set: 2xxx success variants, 4xxx client errors, 5000 for
/// anything unexpected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// Request handled, data (if any) attached.
    Success,
    /// Request handled but no row was touched.
    NoDataChanges,
    /// A new row was written.
    Created,
    /// An existing row was overwritten.
    Updated,
    /// Malformed request body or parameters.
    BadRequest,
    /// State value outside the accepted set, or a rejected state/score change.
    BadStateRequest,
    /// Authorization token missing or unusable.
    NotAuthorization,
    /// Caller is authenticated but not allowed to do this.
    NotAuthentication,
    /// No user matches the caller or the target.
    NotFoundUser,
    /// The student id is not in the enrollment directory.
    NotFoundStudent,
    /// An external dependency failed to produce a result.
    CantGetResources,
    /// File row or stored blob missing.
    NotFoundFile,
    /// Category missing.
    NotFoundCategory,
    /// Generic lookup miss (assignment, writing, chat room).
    NotFoundData,
    /// Submission attempted outside the assignment window.
    ExpiredAssignment,
    /// A row with the same identity already exists.
    ExistData,
    /// Unexpected server-side fault.
    InternalError,
}

impl ResponseStatus {
    /// The wire code clients dispatch on.
    pub fn code(&self) -> u16 {
        match self {
            Self::Success => 2000,
            Self::NoDataChanges => 2001,
            Self::Created => 2010,
            Self::Updated => 2011,
            Self::BadRequest => 4000,
            Self::BadStateRequest => 4001,
            Self::NotAuthorization => 4011,
            Self::NotAuthentication => 4012,
            Self::NotFoundUser => 4041,
            Self::NotFoundStudent => 4043,
            Self::CantGetResources => 4044,
            Self::NotFoundFile => 4045,
            Self::NotFoundCategory => 4046,
            Self::NotFoundData => 4047,
            Self::ExpiredAssignment => 4090,
            Self::ExistData => 4091,
            Self::InternalError => 5000,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::NoDataChanges => "SUCCESS, BUT NO DATA CHANGES",
            Self::Created => "CREATED_SUCCESS",
            Self::Updated => "UPDATED_SUCCESS",
            Self::BadRequest => "BAD REQUEST",
            Self::BadStateRequest => "BAD STATE REQUEST",
            Self::NotAuthorization => "AUTHORIZATION TOKEN IS EMPTY",
            Self::NotAuthentication => "AUTHENTICATION FAILED",
            Self::NotFoundUser => "USER NOT FOUND",
            Self::NotFoundStudent => "TARGET STUDENT NOT FOUND",
            Self::CantGetResources => "CANT GET RESOURCES",
            Self::NotFoundFile => "FILE NOT FOUND",
            Self::NotFoundCategory => "CATEGORY NOT FOUND",
            Self::NotFoundData => "DATA NOT FOUND",
            Self::ExpiredAssignment => "EXPIRED ASSIGNMENT",
            Self::ExistData => "CONFLICT DATA",
            Self::InternalError => "INTERNAL SERVER ERROR",
        }
    }

    /// Returns true for the 2xxx variants.
    pub fn is_success(&self) -> bool {
        self.code() < 4000
    }
}
