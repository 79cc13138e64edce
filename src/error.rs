use std::path::PathBuf;

use thiserror::Error;

/// Error type for adbi operations
#[derive(Debug, Error)]
pub enum AdbiError {
    #[error("Unable to determine a paramstyle for the given driver")]
    UndiscoverableParamStyle,

    #[error("Unsupported paramstyle: {0}")]
    UnsupportedParamStyle(String),

    #[error("Schema directory is not an existing directory: {}", .0.display())]
    InvalidSchemaDir(PathBuf),

    #[error("Schema file format does not have a valid {{version}} field: {0}")]
    InvalidSchemaFileFormat(String),

    #[error("No schema directory has been configured")]
    SchemaDirNotSet,

    #[error("Cannot find the current schema ({file}) in the schema directory ({})", .dir.display())]
    MissingCurrentSchema { file: String, dir: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Underlying driver does not support {0}")]
    Unsupported(&'static str),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for adbi operations
pub type Result<T> = std::result::Result<T, AdbiError>;
