use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata for an uploaded file; the blob lives on local disk at `path`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display title given by the uploader.
    pub name: String,
    /// Original client-side filename, kept for downloads.
    pub file_name: String,
    /// Storage path under the configured upload directory.
    pub path: String,
    pub size: i64,

    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
