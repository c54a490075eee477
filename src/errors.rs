use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// A `move-<id>` / `pokemon-<id>` lookup failed
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
    /// Reference data could not be read or parsed
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),
    /// The battle configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to resource store lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// No resource is stored under the key
    #[error("Resource not found: {key}")]
    NotFound { key: String },
}

/// Errors raised while loading reference data files
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Errors raised while loading a battle configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type alias for battle engine operations
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Result type alias for resource lookups
pub type ResourceResult<T> = Result<T, ResourceError>;
