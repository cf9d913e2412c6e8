use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] backtester_core::ValidationError),

    #[error(transparent)]
    Core(#[from] backtester_core::CoreError),

    #[error("quote fetch failed: {0}")]
    Fetch(#[from] backtester_core::FetchError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Core(_) => 3,
            Self::Fetch(_) => 4,
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
