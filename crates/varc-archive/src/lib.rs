//! In-memory virtual archives.
//!
//! An [`Archive`] is a named, path-addressed collection of assets that can
//! be built up programmatically, nested inside other archives, merged,
//! filtered, listed, and serialized as ZIP or TAR. Archives are created by an
//! [`ArchiveFactory`] holding an explicit [`ArchiveConfig`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use varc_archive::{ArchiveFactory, ByteAsset, ListingStyle};
//!
//! # fn main() -> varc_archive::ArchiveResult<()> {
//! let factory = ArchiveFactory::default();
//! let lib = factory.create("util.jar")?;
//! lib.add("/org/Util.class", Arc::new(ByteAsset::from("...")))?;
//!
//! let app = factory.create("app.war")?;
//! app.add("/index.html", Arc::new(ByteAsset::from("<html/>")))?
//!     .add_archive("/WEB-INF/lib", &lib)?;
//!
//! assert!(app.contains("/WEB-INF/lib/util.jar/org/Util.class"));
//! println!("{}", app.listing(ListingStyle::Verbose));
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod asset;
pub mod config;
pub mod error;
pub mod export;
pub mod factory;
pub mod filter;

pub use archive::Archive;
pub use asset::ArchiveAsset;
pub use config::{ArchiveConfig, ZipCompression};
pub use error::{ArchiveError, ArchiveResult};
pub use export::{exporter_for, ArchiveExporter, TarExporter, TarGzExporter, ZipExporter};
pub use factory::ArchiveFactory;
pub use filter::{ExcludePaths, Filter, Filters, IncludeAll, IncludePaths, IncludeUnder};

// Re-export key types
pub use varc_asset::{
    Asset, AssetError, AssetKind, ByteAsset, EmptyAsset, FileAsset, ResourceAsset, ResourceRoots,
    StreamAsset, UrlAsset,
};
pub use varc_store::{Entry, ListingStyle, Node, NodeTree, StoreError};
pub use varc_types::{ArchiveFormat, ArchiveName, ArchivePath, ArchivePaths, IntoArchivePath};
