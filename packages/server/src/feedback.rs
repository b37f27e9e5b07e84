use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::FeedbackConfig;

/// Failure of the external generation service. Propagates to the caller as
/// a dependency failure; never retried.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("generation response contained no text")]
    Empty,
}

#[derive(Serialize)]
struct GenerationRequest {
    model: String,
    messages: Vec<GenerationMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct GenerationMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct GenerationResponse {
    choices: Vec<GenerationChoice>,
}

#[derive(Deserialize)]
struct GenerationChoice {
    message: GenerationChoiceMessage,
}

#[derive(Deserialize)]
struct GenerationChoiceMessage {
    content: String,
}

/// Client for the external text-generation endpoint used for writing feedback.
pub struct FeedbackClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl FeedbackClient {
    pub fn new(config: &FeedbackConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Fixed template combining the assignment's stored prompt with the
    /// student's content.
    pub fn compose_prompt(constraints: &str, content: &str) -> String {
        format!("Constraints: {constraints} Content: {content}")
    }

    /// Request feedback for a student's writing. Non-streaming; blocks the
    /// calling request until the service answers.
    pub async fn request_feedback(
        &self,
        constraints: &str,
        content: &str,
    ) -> Result<String, FeedbackError> {
        let body = GenerationRequest {
            model: self.model.clone(),
            messages: vec![GenerationMessage {
                role: "user",
                content: Self::compose_prompt(constraints, content),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedbackError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: GenerationResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(FeedbackError::Empty)?;

        info!(model = %self.model, "Generated feedback ({} chars)", text.len());
        Ok(text)
    }
}
