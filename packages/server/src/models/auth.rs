use common::RegisterState;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct OauthLoginQuery {
    /// Authorization code returned by the provider's redirect.
    pub code: String,
}

/// Token pair handed out after login, registration or refresh.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthLoginRes {
    pub access_token: String,
    pub refresh_token: String,
    /// Whether the account has linked a student identity yet.
    pub register_state: RegisterState,
    #[schema(example = "2021111222")]
    pub student_id: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct PostAuthRegisterReq {
    #[schema(example = "2021111222")]
    pub student_id: String,
    /// Enrollment name the student id must match.
    #[schema(example = "trust1204@stu.kmu.ac.kr")]
    pub name: String,
}

pub fn validate_register_request(req: &PostAuthRegisterReq) -> Result<(), AppError> {
    let student_id = req.student_id.trim();
    if student_id.is_empty() || student_id.chars().count() > 30 {
        return Err(AppError::Validation(
            "Student id must be 1-30 characters".into(),
        ));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    Ok(())
}
