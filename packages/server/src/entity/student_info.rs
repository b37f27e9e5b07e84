use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment directory consulted at registration.
/// Seeded out of band; this service only reads it.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: String,

    pub name: String,
}

impl ActiveModelBehavior for ActiveModel {}
