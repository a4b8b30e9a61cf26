//! Serialization of archives into ZIP and TAR streams.
//!
//! Exporters walk the archive's node tree depth-first, so every directory
//! entry precedes its children. Implied directories are written as explicit
//! directory entries. A nested archive is written as a single file holding
//! its own serialized bytes.
//!
//! Output is deterministic: fixed timestamps, fixed permissions, and
//! path-ordered entries.

mod tar;
mod zip;

use std::io::{self, Write};

use tracing::debug;
use varc_types::ArchiveFormat;

use crate::archive::Archive;
use crate::config::ArchiveConfig;
use crate::error::ArchiveResult;

pub use self::tar::{TarExporter, TarGzExporter};
pub use self::zip::ZipExporter;

/// Writes an archive's content in one container format.
pub trait ArchiveExporter: Send + Sync {
    fn format(&self) -> ArchiveFormat;

    /// Serialize `archive` into `out`. Returns the number of bytes written.
    fn export(&self, archive: &Archive, out: &mut dyn Write) -> ArchiveResult<u64>;
}

/// The exporter for `format`, configured from `config`.
pub fn exporter_for(format: ArchiveFormat, config: &ArchiveConfig) -> Box<dyn ArchiveExporter> {
    match format {
        ArchiveFormat::Zip => Box::new(ZipExporter::new(
            config.zip_compression,
            config.compression_level,
        )),
        ArchiveFormat::Tar => Box::new(TarExporter),
        ArchiveFormat::TarGz => Box::new(TarGzExporter::new(config.compression_level)),
    }
}

/// One flattened entry ready to be written.
pub(crate) struct ExportEntry {
    /// Relative name; directories end with `/`.
    pub name: String,
    /// File content, or `None` for a directory.
    pub data: Option<Vec<u8>>,
}

impl ExportEntry {
    pub fn is_directory(&self) -> bool {
        self.data.is_none()
    }
}

/// Read every entry of `archive` into memory, in tree order.
pub(crate) fn collect_entries(archive: &Archive) -> ArchiveResult<Vec<ExportEntry>> {
    let tree = archive.tree();
    let mut entries = Vec::with_capacity(tree.len());
    for node in tree.walk() {
        let path = node.path();
        if path.is_root() {
            continue;
        }
        let relative = &path.as_str()[1..];
        let entry = match node.content() {
            Some(asset) => ExportEntry {
                name: relative.to_string(),
                data: Some(asset.read_to_vec()?),
            },
            None => ExportEntry {
                name: format!("{relative}/"),
                data: None,
            },
        };
        entries.push(entry);
    }
    debug!(archive = %archive.name(), entries = entries.len(), "collected entries for export");
    Ok(entries)
}

/// Counts the bytes passed through to the inner writer.
pub(crate) struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::factory::ArchiveFactory;
    use varc_asset::ByteAsset;

    #[test]
    fn entries_include_implied_directories() {
        let archive = ArchiveFactory::default().create("e.zip").unwrap();
        archive.add("/a/b/c.txt", Arc::new(ByteAsset::from("c"))).unwrap();
        archive.add_directory("/empty").unwrap();

        let entries = collect_entries(&archive).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a/", "a/b/", "a/b/c.txt", "empty/"]);
        assert!(entries[0].is_directory());
        assert_eq!(entries[2].data.as_deref(), Some(&b"c"[..]));
    }

    #[test]
    fn unreadable_asset_fails_export() {
        let archive = ArchiveFactory::default().create("bad.zip").unwrap();
        archive
            .add("/gone", Arc::new(varc_asset::FileAsset::new("/no/such/file").unwrap()))
            .unwrap();
        assert!(archive.to_bytes().is_err());
    }

    #[test]
    fn exporter_matches_format() {
        let config = ArchiveConfig::default();
        for format in ArchiveFormat::all() {
            assert_eq!(exporter_for(format, &config).format(), format);
        }
    }

    #[test]
    fn counting_writer_counts() {
        let mut w = CountingWriter::new(Vec::new());
        w.write_all(b"hello").unwrap();
        assert_eq!(w.written(), 5);
        assert_eq!(w.inner, b"hello");
    }
}
