/// Errors from asset construction and stream opening.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing resource could not be read.
    #[error("I/O error reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A named resource was not present under any configured root.
    #[error("resource not found: {name} (searched {searched} roots)")]
    ResourceNotFound { name: String, searched: usize },

    /// The URL scheme has no reader.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// An HTTP fetch failed.
    #[error("failed to fetch {url}: {reason}")]
    Http { url: String, reason: String },

    /// A one-shot stream was already handed out.
    #[error("stream already consumed: {0}")]
    StreamConsumed(String),

    /// Serializing an archive-backed asset failed.
    #[error("archive export failed: {0}")]
    Export(String),
}

impl AssetError {
    /// Wrap an I/O error with the location that produced it.
    pub fn io(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            location: location.into(),
            source,
        }
    }
}

/// Result alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
