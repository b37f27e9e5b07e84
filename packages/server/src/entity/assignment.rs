use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    /// Maximum score; copied onto each writing at submission time.
    pub score: i32,
    /// Submission window, inclusive on both ends.
    pub start_date: Date,
    pub end_date: Date,
    /// Context prepended to feedback requests. NULL means no constraints.
    pub prompt: Option<String>,

    #[sea_orm(has_many)]
    pub writings: HasMany<super::writing::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
