use std::fmt;

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;
use serde::{Deserialize, Serialize};

/// Supported OAuth identity providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum OauthProvider {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "kakao"))]
    Kakao,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "naver"))]
    Naver,
}

impl OauthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Naver => "naver",
        }
    }

    /// Parse a path segment; `None` for unknown providers.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "kakao" => Some(Self::Kakao),
            "naver" => Some(Self::Naver),
            _ => None,
        }
    }
}

impl fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
