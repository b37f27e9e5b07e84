use serde::{Deserialize, Serialize};

/// Lifecycle state of a writing submission.
///
/// The wire format carries the raw small integer (`value()`); anything that
/// does not parse back through [`WritingState::from_value`] is rejected at
/// the request boundary rather than stored.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly as a
/// small-integer entity column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i16", db_type = "SmallInteger")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritingState {
    /// Row reserved but nothing handed in yet.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    NotSubmitted,
    /// Student handed the writing in.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    Submitted,
    /// Professor scored the writing.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 2))]
    Graded,
}

impl WritingState {
    /// The raw value used on the wire and in the database column.
    pub fn value(&self) -> i16 {
        match self {
            Self::NotSubmitted => 0,
            Self::Submitted => 1,
            Self::Graded => 2,
        }
    }

    /// Parse a raw wire value; `None` for anything outside the closed set.
    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::NotSubmitted),
            1 => Some(Self::Submitted),
            2 => Some(Self::Graded),
            _ => None,
        }
    }
}
