use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to send the chat request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Provider error: status {status}: {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to decode the chat response: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("The provider returned no completion")]
    EmptyResponse,
}
