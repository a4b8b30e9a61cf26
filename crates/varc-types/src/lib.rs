//! Foundation types for varc, the in-memory virtual archive.
//!
//! Every other varc crate depends on `varc-types`. Nothing in here touches
//! content; these are the value types used to address it.
//!
//! # Key Types
//!
//! - [`ArchivePath`] — Canonical, absolute, slash-delimited location inside an archive
//! - [`ArchivePaths`] — Factory for building paths from strings and other paths
//! - [`ArchiveName`] — Validated archive name, used as the last segment of a mount point
//! - [`ArchiveFormat`] — Stream format an archive serializes to (ZIP/TAR family)

pub mod error;
pub mod format;
pub mod name;
pub mod path;

pub use error::{TypeError, TypeResult};
pub use format::ArchiveFormat;
pub use name::ArchiveName;
pub use path::{ArchivePath, ArchivePaths, IntoArchivePath, SEPARATOR};
