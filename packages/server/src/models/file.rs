use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::file;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct FileListQuery {
    /// Restrict the listing to one category.
    #[param(example = 1)]
    pub category_id: Option<i32>,
    #[param(example = 0)]
    pub page: Option<u64>,
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FileGetListElementRes {
    #[schema(example = 13)]
    pub id: i32,
    /// Display title given by the uploader.
    #[schema(example = "Today's lecture material")]
    pub name: String,
    /// Original filename, used for downloads.
    #[schema(example = "slides-week1.pdf")]
    pub file_name: String,
    #[schema(example = 312445)]
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<file::Model> for FileGetListElementRes {
    fn from(f: file::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            file_name: f.file_name,
            size: f.size,
            created_at: f.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FileGetListRes {
    pub files: Vec<FileGetListElementRes>,
    #[schema(example = 3)]
    pub total_elements: u64,
}
