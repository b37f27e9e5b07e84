use common::{RegisterState, Role};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// NULL until registration links a student identity.
    #[sea_orm(unique)]
    pub student_id: Option<String>,
    pub role: Role,
    pub register_state: RegisterState,

    #[sea_orm(has_many)]
    pub oauths: HasMany<super::oauth::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
