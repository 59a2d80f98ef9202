//! Runtime configuration, resolved once at startup.
//!
//! Values are looked up in this order: explicit CLI flags, the process environment,
//! a dotenv file and finally the built-in defaults. A dotenv file never overrides a
//! variable that is already set.

use std::{
    env,
    fmt,
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Model used when neither `--model` nor `GPT_MODEL` are set
pub static DEFAULT_MODEL: &str = "gpt-4o-mini";
/// OpenAI-compatible API root; `/chat/completions` is appended to it
pub static DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Handoff file between the generator and `git commit`
pub static DEFAULT_MESSAGE_FILE: &str = "/tmp/commitmsg.txt";

pub static API_KEY_VAR: &str = "OPENAI_API_KEY";
pub static MODEL_VAR: &str = "GPT_MODEL";
pub static BASE_URL_VAR: &str = "OPENAI_BASE_URL";

static ENV_FILE_NAME: &str = ".env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("The file {} does not exist or is not readable.", path.display())]
    EnvFileUnreadable { path: PathBuf },
    #[error("Failed to load environment file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("Please set the OPENAI_API_KEY environment variable or create a .env file with the key.")]
    MissingApiKey,
}

/// The raw inputs of the configuration, before anything is read from disk
#[derive(Debug, Default, Clone)]
pub struct ConfigSources {
    /// Explicit env file; it must exist when set
    pub env_file: Option<PathBuf>,
    /// Env file loaded only when present and no explicit one is given
    pub default_env_file: Option<PathBuf>,
    pub model: Option<String>,
    pub timeout: Option<Duration>,
}

impl ConfigSources {
    pub fn new(env_file: Option<PathBuf>, model: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            env_file: env_file.filter(|path| !path.as_os_str().is_empty()),
            default_env_file: default_env_file(),
            model: model.filter(|model| !model.is_empty()),
            timeout,
        }
    }
}

/// `.env` placed next to the running executable, with symlinks resolved
pub fn default_env_file() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(|dir| dir.join(ENV_FILE_NAME))
}

/// Fully resolved configuration
#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub message_file: PathBuf,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("message_file", &self.message_file)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load the env file (if any) into the process environment and resolve the config
    pub fn load(sources: &ConfigSources) -> Result<Self, ConfigError> {
        load_env_file(sources)?;

        let api_key = non_empty_var(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        let model = sources
            .model
            .clone()
            .or_else(|| non_empty_var(MODEL_VAR))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = non_empty_var(BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = Self {
            api_key,
            model,
            base_url,
            message_file: PathBuf::from(DEFAULT_MESSAGE_FILE),
            timeout: sources.timeout,
        };

        debug!(?config, "Configuration resolved");
        Ok(config)
    }
}

/// Load the explicit env file, or else the default one when it is readable
fn load_env_file(sources: &ConfigSources) -> Result<(), ConfigError> {
    if let Some(path) = &sources.env_file {
        if !is_readable_file(path) {
            return Err(ConfigError::EnvFileUnreadable { path: path.clone() });
        }

        dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
            path: path.clone(),
            source,
        })?;
        info!(?path, "Loaded environment file");
        return Ok(());
    }

    let Some(path) = &sources.default_env_file else {
        return Ok(());
    };

    if !is_readable_file(path) {
        debug!(?path, "Default environment file not found, skipping");
        return Ok(());
    }

    match dotenvy::from_path(path) {
        Ok(()) => info!(?path, "Loaded default environment file"),
        Err(e) => warn!(?path, %e, "Ignoring invalid default environment file"),
    }

    Ok(())
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
