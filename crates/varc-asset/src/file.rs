//! File-backed assets.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{AssetError, AssetResult};
use crate::traits::{Asset, AssetKind, AssetStream};

/// A file on disk.
///
/// The file is opened each time a stream is requested, so a missing or
/// unreadable file surfaces as [`AssetError::Io`] from `open_stream`, not at
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileAsset {
    path: PathBuf,
}

impl FileAsset {
    /// Reference a file. Fails only if `path` is empty.
    pub fn new(path: impl Into<PathBuf>) -> AssetResult<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(AssetError::InvalidArgument("file path must be specified".into()));
        }
        Ok(Self { path })
    }

    /// The referenced file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Asset for FileAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        trace!(path = %self.path.display(), "opening file asset");
        let file = File::open(&self.path)
            .map_err(|e| AssetError::io(self.path.display().to_string(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn kind(&self) -> AssetKind {
        AssetKind::File
    }
}
