use common::{RegisterState, Role};
use serde::{Deserialize, Serialize};

use crate::entity::user;

#[derive(Serialize, utoipa::ToSchema)]
pub struct GetUserRes {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "2021111222")]
    pub student_id: Option<String>,
    pub role: Role,
    pub register_state: RegisterState,
}

impl From<user::Model> for GetUserRes {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            student_id: u.student_id,
            role: u.role,
            register_state: u.register_state,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GetUserListRes {
    pub users: Vec<GetUserRes>,
    #[schema(example = 47)]
    pub total_elements: u64,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserSearchQuery {
    /// Substring of the student id to search for.
    #[param(example = "2021")]
    pub student_id: String,
    #[param(example = 0)]
    pub page: Option<u64>,
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

/// Admin-side account update; enum fields arrive as raw wire values and are
/// parsed-or-rejected in the handler.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PutUserReq {
    /// Student id identifying the account to update.
    #[schema(example = "2021111222")]
    pub student_id: String,
    #[schema(example = 1)]
    pub role: i16,
    #[schema(example = 1)]
    pub register_state: i16,
    /// Replacement student id, when renumbering an account.
    pub new_student_id: Option<String>,
}
