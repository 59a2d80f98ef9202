use crate::chat::{ChatError, Message};

/// A chat completion provider
pub trait Provider {
    /// Send the conversation and return the text of the first completion
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ChatError>;
}

impl<P: Provider> Provider for &P {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ChatError> {
        (**self).complete(model, messages).await
    }
}
