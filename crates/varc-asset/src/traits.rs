//! The [`Asset`] trait.

use std::any::Any;
use std::fmt;
use std::io::Read;

use crate::error::{AssetError, AssetResult};

/// A readable byte stream returned by [`Asset::open_stream`].
pub type AssetStream = Box<dyn Read + Send>;

/// Which variant produced an asset. Used for listings and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Bytes,
    Empty,
    File,
    Url,
    Resource,
    Stream,
    Archive,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes => write!(f, "bytes"),
            Self::Empty => write!(f, "empty"),
            Self::File => write!(f, "file"),
            Self::Url => write!(f, "url"),
            Self::Resource => write!(f, "resource"),
            Self::Stream => write!(f, "stream"),
            Self::Archive => write!(f, "archive"),
        }
    }
}

/// A source of bytes that can be opened on demand.
///
/// Implementations must be thread-safe (`Send + Sync`). Every call to
/// [`open_stream`](Asset::open_stream) returns a fresh stream over the full
/// content; the only exception is [`StreamAsset`](crate::StreamAsset), whose
/// backing reader is inherently single-use.
pub trait Asset: Send + Sync + fmt::Debug {
    /// Open a new stream over the full content.
    fn open_stream(&self) -> AssetResult<AssetStream>;

    /// The variant behind this asset.
    fn kind(&self) -> AssetKind;

    /// The concrete asset, for callers that treat some variants specially.
    ///
    /// Archive-backed assets return themselves so an archive can recognize
    /// them and record a mount point.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    /// Read the full content into memory.
    fn read_to_vec(&self) -> AssetResult<Vec<u8>> {
        let mut stream = self.open_stream()?;
        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .map_err(|e| AssetError::io(self.kind().to_string(), e))?;
        Ok(buf)
    }
}
