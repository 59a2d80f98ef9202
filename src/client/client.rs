use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

use super::provider::Provider;
use crate::{
    chat::{ChatError, Message, Role},
    config::Config,
};

/// Path of the completion endpoint, relative to the configured base url
static COMPLETION_PATH: &str = "/chat/completions";

/// Client for OpenAI-compatible chat completion APIs
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client. No timeout is set unless the config asks for one.
    pub fn new(config: &Config) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client: builder.build()?,
        })
    }

    fn completion_url(&self) -> String {
        format!("{}{}", self.base_url, COMPLETION_PATH)
    }
}

impl Provider for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ChatError> {
        let body = CompletionBody { model, messages };
        let url = self.completion_url();

        info!(%url, %model, "Making request");
        trace!(?body);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&body)?)
            .send()
            .await?;
        debug!(status = %resp.status(), "Response received");

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            error!(%status, %text, "Completion request failed");
            return Err(ChatError::Provider { status, body: text });
        }

        trace!(%text, "raw response");
        let resp = serde_json::from_str::<CompletionResponse>(&text)?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|choice| {
                debug!(role = ?choice.message.role, finish_reason = ?choice.finish_reason);
                choice.message.content
            })
            .ok_or(ChatError::EmptyResponse)
    }
}

/// Request body of a non-streamed completion
#[derive(Serialize, Debug)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

/// Like [`Message`], but the content may be null
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    role: Role,
    content: Option<String>,
}
