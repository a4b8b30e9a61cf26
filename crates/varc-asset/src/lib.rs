//! Byte sources for varc archives.
//!
//! An [`Asset`] is a capability: "open a fresh stream over my bytes". It holds
//! no state beyond what it needs to produce that stream, so the same asset can
//! be read any number of times by any number of callers.
//!
//! # Variants
//!
//! - [`ByteAsset`] -- bytes (or a string) held in memory
//! - [`EmptyAsset`] -- zero-length placeholder leaf
//! - [`FileAsset`] -- a file on disk, opened at read time
//! - [`UrlAsset`] -- a `file:` or `http(s):` URL, fetched at read time
//! - [`ResourceAsset`] -- a named resource located across ordered resource roots
//! - [`StreamAsset`] -- a one-shot reader; readable exactly once
//!
//! The archive-backed variant lives in `varc-archive`, next to the archive
//! type it wraps.
//!
//! # Design Rules
//!
//! 1. `open_stream` returns an independent stream over the full content on every call.
//! 2. Lazy variants validate only their references at construction; the backing
//!    resource is touched when the stream is opened.
//! 3. Resource lookup is eager: a resource that cannot be located is an error up front.
//! 4. Failures are returned, never turned into empty content.

pub mod error;
pub mod file;
pub mod memory;
pub mod remote;
pub mod resource;
pub mod stream;
pub mod traits;

pub use error::{AssetError, AssetResult};
pub use file::FileAsset;
pub use memory::{ByteAsset, EmptyAsset};
pub use remote::UrlAsset;
pub use resource::{ResourceAsset, ResourceRoots};
pub use stream::StreamAsset;
pub use traits::{Asset, AssetKind, AssetStream};
