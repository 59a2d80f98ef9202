use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::provider::Provider;

use super::{
    errors::ChatError,
    prompts::{COMMIT_SYSTEM, commit_user_prompt},
};

/// Diffs longer than this are cut before being sent
pub const MAX_DIFF_CHARS: usize = 16_000;
/// Length of an oversized diff after the cut
pub const TRUNCATED_DIFF_CHARS: usize = 12_000;

/// Generates commit messages through a chat provider
pub struct Chat<P: Provider> {
    provider: P,
    model: String,
}

impl<P: Provider> Chat<P> {
    /// Create new chat
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Ask the provider for a commit message describing `diff`. The diff is sent as-is;
    /// see [`prepare_diff`] for the size limit.
    pub async fn generate_commit_message(&self, diff: &str) -> Result<String, ChatError> {
        let messages = [
            Message {
                role: Role::System,
                content: COMMIT_SYSTEM.to_string(),
            },
            Message {
                role: Role::User,
                content: commit_user_prompt(diff),
            },
        ];

        info!(model = %self.model, chars = diff.len(), "Requesting commit message");
        let content = self.provider.complete(&self.model, &messages).await?;
        debug!(%content, "Commit message received");

        Ok(content)
    }
}

/// A diff ready to be sent, cut down when it was too large
#[derive(Debug, PartialEq)]
pub struct PreparedDiff<'a> {
    pub text: &'a str,
    pub truncated: bool,
}

/// Keep the first [`TRUNCATED_DIFF_CHARS`] characters of a diff longer than
/// [`MAX_DIFF_CHARS`]. The cut is a plain prefix and may land in the middle of a hunk.
pub fn prepare_diff(diff: &str) -> PreparedDiff<'_> {
    if diff.chars().count() <= MAX_DIFF_CHARS {
        return PreparedDiff {
            text: diff,
            truncated: false,
        };
    }

    let end = diff
        .char_indices()
        .nth(TRUNCATED_DIFF_CHARS)
        .map(|(index, _)| index)
        .unwrap_or(diff.len());

    PreparedDiff {
        text: &diff[..end],
        truncated: true,
    }
}

/// A chat message
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The sender of the message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}
