//! The archive-backed asset.

use std::any::Any;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use tracing::trace;
use varc_asset::{Asset, AssetError, AssetKind, AssetResult, AssetStream};

use crate::archive::Archive;

/// An asset whose bytes are an archive serialized with its own format.
///
/// The archive is exported again on every [`open_stream`](Asset::open_stream),
/// so the bytes always reflect its current content.
#[derive(Clone)]
pub struct ArchiveAsset {
    archive: Arc<Archive>,
}

impl ArchiveAsset {
    pub(crate) fn new(archive: Arc<Archive>) -> Self {
        Self { archive }
    }

    /// The wrapped archive.
    pub fn archive(&self) -> &Arc<Archive> {
        &self.archive
    }
}

impl Asset for ArchiveAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        trace!(archive = %self.archive.name(), "exporting archive-backed asset");
        let bytes = self
            .archive
            .to_bytes()
            .map_err(|e| AssetError::Export(format!("{}: {e}", self.archive.name())))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Archive
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl fmt::Debug for ArchiveAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveAsset")
            .field("archive", self.archive.name())
            .finish()
    }
}
