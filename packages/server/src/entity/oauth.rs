use common::OauthProvider;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Link between a provider-side identity and a local user.
/// Unique per (provider, oauth_id); `user_id` is NULL while the
/// fire-and-forget link write from login is still in flight.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oauth")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub provider: OauthProvider,
    /// Provider-side stable subject identifier.
    pub oauth_id: String,

    pub user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<Option<super::user::Entity>>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
