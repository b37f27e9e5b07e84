use async_trait::async_trait;
use common::OauthProvider;
use serde::Deserialize;
use tracing::debug;

use crate::config::{OauthConfig, OauthProviderConfig};

/// What the server needs from a provider: a stable subject identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthIdentity {
    pub provider: OauthProvider,
    pub oauth_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OauthError {
    #[error("oauth request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: OauthProvider,
        status: u16,
        body: String,
    },
    #[error("{provider} response missing the subject identifier")]
    MissingSubject { provider: OauthProvider },
}

/// Exchanges an authorization code for the caller's provider-side identity.
///
/// Token issuance and validation live entirely on the provider; this trait
/// is the whole surface the rest of the server sees.
#[async_trait]
pub trait OauthClient: Send + Sync {
    async fn fetch_identity(
        &self,
        provider: OauthProvider,
        code: &str,
    ) -> Result<OauthIdentity, OauthError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct KakaoProfile {
    id: i64,
}

#[derive(Deserialize)]
struct NaverProfile {
    response: NaverProfileInner,
}

#[derive(Deserialize)]
struct NaverProfileInner {
    id: String,
}

const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_PROFILE_URL: &str = "https://kapi.kakao.com/v2/user/me";
const NAVER_TOKEN_URL: &str = "https://nid.naver.com/oauth2.0/token";
const NAVER_PROFILE_URL: &str = "https://openapi.naver.com/v1/nid/me";

/// reqwest-backed implementation talking to Kakao and Naver.
pub struct HttpOauthClient {
    client: reqwest::Client,
    config: OauthConfig,
}

impl HttpOauthClient {
    pub fn new(config: OauthConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    async fn exchange_code(
        &self,
        provider: OauthProvider,
        token_url: &str,
        provider_config: &OauthProviderConfig,
        code: &str,
    ) -> Result<String, OauthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", provider_config.client_id.as_str()),
            ("client_secret", provider_config.client_secret.as_str()),
            ("redirect_uri", provider_config.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self.client.post(token_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OauthError::Api {
                provider,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn fetch_profile(
        &self,
        provider: OauthProvider,
        profile_url: &str,
        access_token: &str,
    ) -> Result<String, OauthError> {
        let response = self
            .client
            .get(profile_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OauthError::Api {
                provider,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        match provider {
            OauthProvider::Kakao => {
                let profile: KakaoProfile = response.json().await?;
                Ok(profile.id.to_string())
            }
            OauthProvider::Naver => {
                let profile: NaverProfile = response.json().await?;
                if profile.response.id.is_empty() {
                    return Err(OauthError::MissingSubject { provider });
                }
                Ok(profile.response.id)
            }
        }
    }
}

#[async_trait]
impl OauthClient for HttpOauthClient {
    async fn fetch_identity(
        &self,
        provider: OauthProvider,
        code: &str,
    ) -> Result<OauthIdentity, OauthError> {
        let (token_url, profile_url, provider_config) = match provider {
            OauthProvider::Kakao => (KAKAO_TOKEN_URL, KAKAO_PROFILE_URL, &self.config.kakao),
            OauthProvider::Naver => (NAVER_TOKEN_URL, NAVER_PROFILE_URL, &self.config.naver),
        };

        let access_token = self
            .exchange_code(provider, token_url, provider_config, code)
            .await?;
        let oauth_id = self
            .fetch_profile(provider, profile_url, &access_token)
            .await?;

        debug!(%provider, "Resolved oauth identity");
        Ok(OauthIdentity { provider, oauth_id })
    }
}
