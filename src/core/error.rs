//! Error taxonomy shared by the session, the streaming client, and startup.

/// Fatal startup problems. No conversation is possible until they are fixed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{var} is not set; export your API key before starting a chat")]
    MissingCredential { var: &'static str },

    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write config at {path}: {message}")]
    Write { path: String, message: String },

    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Failure of an open (or opening) response stream. Recovered locally by the
/// session; never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("could not reach the provider: {0}")]
    Transport(String),

    #[error("provider responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("provider reported an error: {0}")]
    Provider(String),

    #[error("prompt was blocked by the provider ({0})")]
    Blocked(String),

    #[error("response stream ended abnormally: {0}")]
    Interrupted(String),

    #[error("malformed stream payload: {0}")]
    Malformed(String),
}

/// Submissions the session refuses without touching the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputRejected {
    #[error("message is empty")]
    Empty,

    #[error("a reply is still streaming")]
    Busy,
}
