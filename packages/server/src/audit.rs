use chrono::Utc;
use common::OauthProvider;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Set, Statement,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::entity::feedback;

/// A fire-and-forget persistence job.
///
/// The triggering request's response never waits for one of these; a lost
/// job is accepted data loss.
#[derive(Debug)]
pub enum AuditJob {
    /// Record one generation-service round trip for later review.
    SaveFeedback {
        student_id: String,
        request: String,
        response: String,
    },
    /// Link a provider-side identity to the user created for it at login.
    LinkOauth {
        provider: OauthProvider,
        oauth_id: String,
        user_id: i32,
    },
}

impl AuditJob {
    fn kind(&self) -> &'static str {
        match self {
            AuditJob::SaveFeedback { .. } => "save_feedback",
            AuditJob::LinkOauth { .. } => "link_oauth",
        }
    }
}

/// Bounded queue feeding a single background writer task.
///
/// `enqueue` never blocks: when the queue is full or the writer is gone the
/// job is dropped with a warning. The writer swallows and logs persistence
/// errors; there is no retry and no escalation.
#[derive(Clone)]
pub struct AuditWriter {
    tx: mpsc::Sender<AuditJob>,
}

impl AuditWriter {
    pub fn spawn(db: DatabaseConnection, queue_capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<AuditJob>(queue_capacity);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let kind = job.kind();
                if let Err(e) = run_job(&db, job).await {
                    warn!(kind, error = %e, "Audit write failed, dropping job");
                }
            }
            info!("Audit writer stopped");
        });

        Self { tx }
    }

    pub fn enqueue(&self, job: AuditJob) {
        let kind = job.kind();
        if let Err(e) = self.tx.try_send(job) {
            warn!(kind, error = %e, "Audit queue rejected job, dropping");
        }
    }

    #[cfg(test)]
    fn from_sender(tx: mpsc::Sender<AuditJob>) -> Self {
        Self { tx }
    }
}

async fn run_job(db: &DatabaseConnection, job: AuditJob) -> Result<(), DbErr> {
    match job {
        AuditJob::SaveFeedback {
            student_id,
            request,
            response,
        } => {
            let record = feedback::ActiveModel {
                student_id: Set(student_id),
                request: Set(request),
                response: Set(response),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            record.insert(db).await?;
        }
        AuditJob::LinkOauth {
            provider,
            oauth_id,
            user_id,
        } => {
            // A concurrent login may have written the link already; keep
            // whichever account claimed the identity first.
            let stmt = Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO oauth (provider, oauth_id, user_id, created_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (provider, oauth_id) DO UPDATE
                SET user_id = COALESCE(oauth.user_id, EXCLUDED.user_id)
                "#,
                [
                    provider.as_str().into(),
                    oauth_id.into(),
                    user_id.into(),
                    Utc::now().into(),
                ],
            );
            db.execute_raw(stmt).await?;
        }
    }
    Ok(())
}
