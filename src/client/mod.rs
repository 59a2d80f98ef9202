mod client;
pub mod provider;
pub use client::OpenAiClient;
