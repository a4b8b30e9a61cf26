//! The [`NestedArchive`] trait: the seam a store recurses through.

use varc_types::{ArchiveName, ArchivePath};

use crate::entry::Entry;

/// An archive that can be mounted inside a [`ContentStore`](crate::ContentStore).
///
/// When a lookup misses the outer store's own map and the path lies below a
/// mount point, the outer store calls [`resolve`](NestedArchive::resolve) on
/// the mounted archive with the remainder of the path. The nested archive
/// resolves that remainder against its own entries and mounts, so resolution
/// proceeds one nesting level per hop.
///
/// Implementations must be thread-safe and must lock only their own state.
pub trait NestedArchive: Send + Sync {
    /// The archive's name; it becomes the last segment of its mount point.
    fn name(&self) -> &ArchiveName;

    /// Resolve `path` (relative to this archive's root) to an entry.
    fn resolve(&self, path: &ArchivePath) -> Option<Entry>;
}
