use std::sync::Arc;

use varc_asset::Asset;

/// The value stored at a path: an asset, or an explicit directory marker.
///
/// A directory marker is distinct from "absent": the path exists, it just
/// holds no content.
#[derive(Clone, Debug)]
pub enum Entry {
    Directory,
    Asset(Arc<dyn Asset>),
}

impl Entry {
    /// Does this represent a directory?
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Does this represent an asset?
    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset(_))
    }

    /// The asset, if any.
    pub fn asset(&self) -> Option<&Arc<dyn Asset>> {
        match self {
            Self::Directory => None,
            Self::Asset(asset) => Some(asset),
        }
    }

    /// Consume into the asset, if any.
    pub fn into_asset(self) -> Option<Arc<dyn Asset>> {
        match self {
            Self::Directory => None,
            Self::Asset(asset) => Some(asset),
        }
    }
}

impl From<Arc<dyn Asset>> for Entry {
    fn from(asset: Arc<dyn Asset>) -> Self {
        Self::Asset(asset)
    }
}
