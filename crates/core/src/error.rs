use std::io;

/// Errors that can occur during envrun operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown environment '{name}' (defined environments: {available})")]
    UnknownEnvironment { name: String, available: String },

    #[error("Command not found: {program}")]
    CommandNotFound { program: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code the CLI surfaces for this error.
    ///
    /// Command failures carry the failing command's own exit code in the run
    /// report instead; this mapping only covers faults that stop a run before
    /// or between commands.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigError(_) | Error::UnknownEnvironment { .. } | Error::TomlError(_) => 2,
            Error::CommandNotFound { .. } => 127,
            _ => 1,
        }
    }
}

/// Result type alias for envrun operations
pub type Result<T> = std::result::Result<T, Error>;
