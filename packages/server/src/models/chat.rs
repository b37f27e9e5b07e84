use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{chat, chat_room};
use crate::error::AppError;

/// Longest accepted question or answer, matching the column width.
pub const MAX_COMMENT_CHARS: usize = 5000;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct StudentChatPostReq {
    #[schema(example = "When is the deadline for week 2?")]
    pub question: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ProfChatPostReq {
    #[schema(example = "2021111222")]
    pub student_id: String,
    #[schema(example = "The deadline is Friday.")]
    pub comment: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProfChatQuery {
    #[param(example = "2021111222")]
    pub student_id: String,
}

/// One message in a thread, student question or professor answer.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ChatElementRes {
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub is_question: bool,
}

impl From<chat::Model> for ChatElementRes {
    fn from(c: chat::Model) -> Self {
        Self {
            comment: c.comment,
            created_at: c.created_at,
            is_question: c.is_question,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfChatListElementRes {
    #[schema(example = "2021111222")]
    pub student_id: String,
    /// Raw room state value.
    #[schema(example = 0)]
    pub chat_state: i16,
    pub created_at: DateTime<Utc>,
}

impl From<chat_room::Model> for ProfChatListElementRes {
    fn from(room: chat_room::Model) -> Self {
        Self {
            student_id: room.student_id,
            chat_state: room.state.value(),
            created_at: room.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfChatListRes {
    #[schema(example = 12)]
    pub total_elements: u64,
    pub chat_list: Vec<ProfChatListElementRes>,
}

pub fn validate_comment(comment: &str) -> Result<(), AppError> {
    if comment.trim().is_empty() {
        return Err(AppError::Validation("Comment must not be empty".into()));
    }
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(())
}
