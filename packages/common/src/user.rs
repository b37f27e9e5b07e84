use serde::{Deserialize, Serialize};

/// Role of an account. Stored as its ordinal, carried in JWT claims by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i16", db_type = "SmallInteger")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    Student,
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    Professor,
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 2))]
    Admin,
}

impl Role {
    pub fn value(&self) -> i16 {
        match self {
            Self::Student => 0,
            Self::Professor => 1,
            Self::Admin => 2,
        }
    }

    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Student),
            1 => Some(Self::Professor),
            2 => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Whether an account finished linking its student identity.
///
/// OAuth login creates an `Inactive` account; registration with a verified
/// (student id, name) pair flips it to `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i16", db_type = "SmallInteger")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegisterState {
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    Inactive,
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    Active,
}

impl RegisterState {
    pub fn value(&self) -> i16 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Inactive),
            1 => Some(Self::Active),
            _ => None,
        }
    }
}
