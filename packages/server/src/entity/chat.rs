use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub chat_room_id: String,
    #[sea_orm(belongs_to, from = "chat_room_id", to = "student_id")]
    pub chat_room: HasOne<super::chat_room::Entity>,

    #[sea_orm(column_type = "Text")]
    pub comment: String,
    /// true for student questions, false for professor answers.
    pub is_question: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
