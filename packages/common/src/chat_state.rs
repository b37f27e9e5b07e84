use serde::{Deserialize, Serialize};

/// Read-state of a student's chat room, from the professor's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i16", db_type = "SmallInteger")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatState {
    /// Student asked, professor has not opened the thread.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    Waiting,
    /// Professor opened the thread.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    Confirmation,
    /// Professor answered or marked the thread done.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 2))]
    Complete,
}

impl ChatState {
    pub fn value(&self) -> i16 {
        match self {
            Self::Waiting => 0,
            Self::Confirmation => 1,
            Self::Complete => 2,
        }
    }

    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Waiting),
            1 => Some(Self::Confirmation),
            2 => Some(Self::Complete),
            _ => None,
        }
    }
}
