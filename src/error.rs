use thiserror::Error;

/// PSL engine error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("IDNA error: {0}")]
    IdnaError(String),
}

pub type Result<T> = std::result::Result<T, PslError>;
