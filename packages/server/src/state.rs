use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::audit::AuditWriter;
use crate::config::AppConfig;
use crate::feedback::FeedbackClient;
use crate::oauth::OauthClient;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub feedback: Arc<FeedbackClient>,
    pub oauth: Arc<dyn OauthClient>,
    pub audit: AuditWriter,
}
