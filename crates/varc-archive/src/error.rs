use std::path::PathBuf;

use varc_asset::AssetError;
use varc_store::StoreError;
use varc_types::TypeError;

/// Errors from archive operations.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to serialize configuration: {0}")]
    ConfigSer(#[from] toml::ser::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigDe(#[from] toml::de::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export failed: {0}")]
    Export(String),
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
