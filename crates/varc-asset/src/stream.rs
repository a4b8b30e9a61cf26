//! One-shot stream assets.

use std::fmt;
use std::io::Read;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::traits::{Asset, AssetKind, AssetStream};

/// Wraps a reader that can only be consumed once.
///
/// The first [`open_stream`](Asset::open_stream) hands out the wrapped reader;
/// every later call fails with [`AssetError::StreamConsumed`]. Callers that
/// need to read the content more than once (including serializing an archive
/// that holds this asset more than once) should buffer it into a
/// [`ByteAsset`](crate::ByteAsset) instead.
pub struct StreamAsset {
    label: String,
    reader: Mutex<Option<AssetStream>>,
}

impl StreamAsset {
    /// Wrap `reader`. `label` identifies the stream in errors.
    pub fn new(label: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self {
            label: label.into(),
            reader: Mutex::new(Some(Box::new(reader))),
        }
    }

    /// Returns `true` once the reader has been handed out.
    pub fn is_consumed(&self) -> bool {
        self.reader.lock().is_none()
    }
}

impl Asset for StreamAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        self.reader
            .lock()
            .take()
            .ok_or_else(|| AssetError::StreamConsumed(self.label.clone()))
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Stream
    }
}

impl fmt::Debug for StreamAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamAsset")
            .field("label", &self.label)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}
