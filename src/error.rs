use std::io;
use std::path::PathBuf;

/// Problems with the installation parameters. Raised at load time, or at
/// trigger time for values that are only interpreted when a request is built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON installation parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing installation parameter `{0}`")]
    MissingParameter(String),

    #[error("No environments configured")]
    NoEnvironments,

    #[error("Environment name must not be empty")]
    EmptyEnvironmentName,

    #[error("Environment `{0}` is configured more than once")]
    DuplicateEnvironment(String),

    #[error("Environment `{0}` sets both trigger_url and [pipeline]; keep one")]
    AmbiguousTarget(String),

    #[error("Unknown environment `{0}`")]
    UnknownEnvironment(String),

    #[error("Malformed pipeline variable `{segment}` (expected NAME=value)")]
    MalformedVariable { segment: String },
}

/// Failure of the pipeline trigger request. The user sees one message for
/// both kinds; the detail only reaches the log. Requests that cannot be built
/// fail earlier with a [`ConfigError`].
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("CI answered with HTTP {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for TriggerError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(e.to_string()),
        }
    }
}
