use serde::{Deserialize, Serialize};

use crate::entity::category;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CategoryPostReq {
    #[schema(example = "Lecture notes")]
    pub name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CategoryPutReq {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Lecture slides")]
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryRes {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Lecture notes")]
    pub name: String,
}

impl From<category::Model> for CategoryRes {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryGetListRes {
    pub categories: Vec<CategoryRes>,
}

pub fn validate_category_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::Validation(
            "Category name must be 1-100 characters".into(),
        ));
    }
    Ok(())
}
