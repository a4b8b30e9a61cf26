//! Path-addressed content store for varc.
//!
//! The [`ContentStore`] is the authoritative state of an archive: a flat map
//! from canonical [`ArchivePath`](varc_types::ArchivePath) to [`Entry`]
//! (an asset, or an explicit directory marker), plus a mount index recording
//! which entries are nested archives. Lookups that miss the flat map are
//! delegated, one nesting level at a time, into the mounted archive whose
//! mount point is an ancestor of the queried path.
//!
//! The [`NodeTree`] is a derived, disposable hierarchy built from a snapshot
//! of the flat map for enumeration and printing.
//!
//! # Invariants
//!
//! 1. No asset has stored descendants, and nothing is stored below an asset.
//! 2. Re-adding an asset at an asset path replaces it (last write wins).
//! 3. Lookups below a mount point resolve inside the mounted archive.
//! 4. The exclusivity check and the insert happen under one write lock, so a
//!    failed add leaves the store unchanged.
//! 5. No lock is held while a lookup recurses into a nested archive.

pub mod entry;
pub mod error;
pub mod node;
pub mod store;
pub mod traits;

pub use entry::Entry;
pub use error::{ConflictKind, StoreError, StoreResult};
pub use node::{ListingStyle, Node, NodeTree};
pub use store::ContentStore;
pub use traits::NestedArchive;
