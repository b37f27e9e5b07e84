use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

/// Credentials for one OAuth provider.
#[derive(Debug, Deserialize, Clone)]
pub struct OauthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OauthConfig {
    pub kakao: OauthProviderConfig,
    pub naver: OauthProviderConfig,
}

/// External text-generation service used for writing feedback.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedbackConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FileConfig {
    /// Directory uploaded blobs are stored under.
    pub upload_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    /// Capacity of the fire-and-forget write queue; overflow is dropped.
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub oauth: OauthConfig,
    pub feedback: FeedbackConfig,
    pub file: FileConfig,
    pub audit: AuditConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.access_ttl_minutes", 60)?
            .set_default("auth.refresh_ttl_days", 14)?
            .set_default("feedback.model", "gpt-4o-mini")?
            .set_default("feedback.timeout_seconds", 60)?
            .set_default("file.upload_dir", "./uploads")?
            .set_default("audit.queue_capacity", 256)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., COBO__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("COBO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
