mod core;
mod errors;
pub mod prompts;
pub use core::{Chat, Message, Role, TRUNCATED_DIFF_CHARS, prepare_diff};
pub use errors::ChatError;
