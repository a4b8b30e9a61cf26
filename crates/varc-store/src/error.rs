use std::fmt;

use varc_types::ArchivePath;

/// Which exclusivity rule a rejected placement violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// An ancestor of the target is an asset, so it cannot have children.
    AncestorIsAsset,
    /// The target already has stored descendants, so it cannot be an asset.
    HasDescendants,
    /// The target is an asset, so it cannot become a directory.
    OccupiedByAsset,
    /// The root is always a directory.
    Root,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AncestorIsAsset => write!(f, "an ancestor is an asset"),
            Self::HasDescendants => write!(f, "the path already has children"),
            Self::OccupiedByAsset => write!(f, "the path is occupied by an asset"),
            Self::Root => write!(f, "the root is always a directory"),
        }
    }
}

/// Errors from content store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// A placement would break directory/asset exclusivity.
    #[error("cannot place {path}: {kind} (conflicts with {conflicting})")]
    PathConflict {
        path: ArchivePath,
        conflicting: ArchivePath,
        kind: ConflictKind,
    },

    /// The path has no direct entry.
    #[error("path not found: {0}")]
    NotFound(ArchivePath),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
