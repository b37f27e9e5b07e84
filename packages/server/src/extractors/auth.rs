use axum::{extract::FromRequestParts, http::request::Parts};
use common::Role;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated caller extracted from the `Authorization: Bearer <token>`
/// header.
///
/// Add this as a handler parameter to require authentication. Role checks
/// happen via `require_role()` in the handler body; student-facing handlers
/// take the stable student identifier from `require_student_id()`.
pub struct AuthUser {
    pub user_id: i32,
    pub student_id: Option<String>,
    pub role: Role,
}

impl AuthUser {
    /// Returns `Ok(())` if the caller has the given role. Admins pass every
    /// role check.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role || self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// The caller's student identifier; absent until registration completes.
    pub fn require_student_id(&self) -> Result<&str, AppError> {
        self.student_id.as_deref().ok_or(AppError::PermissionDenied)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.uid,
            student_id: claims.student_id,
            role: claims.role,
        })
    }
}
