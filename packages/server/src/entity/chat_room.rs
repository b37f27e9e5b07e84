use common::ChatState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One room per student, keyed by student id.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_room")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: String,

    pub state: ChatState,

    #[sea_orm(has_many)]
    pub chats: HasMany<super::chat::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
