use thiserror::Error;

/// A webhook integration whose configuration cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported channel type: {0}")]
    UnknownChannel(String),

    #[error("{channel} integration requires '{key}'")]
    MissingKey { channel: &'static str, key: &'static str },

    #[error("{channel} integration has invalid '{key}': {reason}")]
    InvalidValue {
        channel: &'static str,
        key: &'static str,
        reason: String,
    },

    #[error("unsupported email provider: {0}")]
    UnknownEmailProvider(String),

    #[error("integration config must be a JSON object")]
    NotAnObject,
}
