use std::sync::Arc;

use tracing::{Level, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = server::config::AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::ensure_constraints(&db).await?;

    let feedback = server::feedback::FeedbackClient::new(&config.feedback)?;
    let oauth = server::oauth::HttpOauthClient::new(config.oauth.clone())?;
    let audit = server::audit::AuditWriter::spawn(db.clone(), config.audit.queue_capacity);

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = server::state::AppState {
        db,
        config: Arc::new(config),
        feedback: Arc::new(feedback),
        oauth: Arc::new(oauth),
        audit,
    };

    let app = server::build_router(state);

    info!("CoBo server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
