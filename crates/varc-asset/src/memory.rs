//! In-memory assets.

use std::io::Cursor;

use bytes::Bytes;

use crate::error::AssetResult;
use crate::traits::{Asset, AssetKind, AssetStream};

/// Bytes held in memory.
///
/// Backed by [`Bytes`], so cloning the asset or opening a stream never copies
/// the content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteAsset {
    data: Bytes,
}

impl ByteAsset {
    /// Wrap raw bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Wrap a string as its UTF-8 bytes.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::new(text.into().into_bytes())
    }

    /// The wrapped bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the content is zero-length.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Asset for ByteAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        Ok(Box::new(Cursor::new(self.data.clone())))
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Bytes
    }
}

impl From<Vec<u8>> for ByteAsset {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&'static [u8]> for ByteAsset {
    fn from(data: &'static [u8]) -> Self {
        Self::new(data)
    }
}

impl From<String> for ByteAsset {
    fn from(text: String) -> Self {
        Self::from_string(text)
    }
}

impl From<&str> for ByteAsset {
    fn from(text: &str) -> Self {
        Self::from_string(text)
    }
}

/// A zero-length placeholder leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyAsset;

impl Asset for EmptyAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        Ok(Box::new(std::io::empty()))
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Empty
    }
}
