use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::config::ConfigSources;

/// Write the commit message for the staged changes with a chat model, then review it in
/// the git editor before committing.
#[derive(Parser, Debug)]
#[command(name = "ai-commit", version, about, long_about = None)]
pub struct Cli {
    /// Environment file to load instead of the `.env` next to the executable
    #[arg(long, env = "AI_COMMIT_ENV_FILE", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Model used to write the message, overrides `GPT_MODEL` (default: gpt-4o-mini)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Seconds to wait for the completion API; no limit when omitted
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Ask before opening the editor with the suggested message
    #[arg(long)]
    pub confirm: bool,

    /// Run git as if it was started in this directory
    #[arg(short = 'C', value_name = "PATH")]
    pub directory: Option<PathBuf>,
}

impl Cli {
    pub fn sources(&self) -> ConfigSources {
        ConfigSources::new(
            self.env_file.clone(),
            self.model.clone(),
            self.timeout.map(Duration::from_secs),
        )
    }
}
