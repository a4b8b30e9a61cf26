//! ZIP writer.
//!
//! Zip32 only, no data descriptors: every local header carries the final
//! CRC and sizes. Timestamps are fixed at 1980-01-01 00:00.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use varc_types::ArchiveFormat;

use super::{collect_entries, ArchiveExporter};
use crate::archive::Archive;
use crate::config::ZipCompression;
use crate::error::{ArchiveError, ArchiveResult};

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;

const VERSION: u16 = 20;
const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;
/// MS-DOS date for 1980-01-01.
const DOS_DATE: u16 = (1 << 5) | 1;
/// MS-DOS directory attribute.
const ATTR_DIRECTORY: u32 = 0x10;

/// Writes archives as ZIP files.
#[derive(Clone, Copy, Debug)]
pub struct ZipExporter {
    compression: ZipCompression,
    level: u32,
}

impl ZipExporter {
    pub fn new(compression: ZipCompression, level: u32) -> Self {
        Self {
            compression,
            level: level.min(9),
        }
    }

    fn compress(&self, payload: &[u8]) -> ArchiveResult<(u16, Vec<u8>)> {
        match self.compression {
            ZipCompression::Stored => Ok((METHOD_STORED, payload.to_vec())),
            ZipCompression::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(self.level));
                encoder
                    .write_all(payload)
                    .map_err(|e| ArchiveError::Export(format!("zip deflate failed: {e}")))?;
                let data = encoder
                    .finish()
                    .map_err(|e| ArchiveError::Export(format!("zip deflate finish failed: {e}")))?;
                Ok((METHOD_DEFLATE, data))
            }
        }
    }
}

impl Default for ZipExporter {
    fn default() -> Self {
        Self::new(ZipCompression::Deflate, 6)
    }
}

impl ArchiveExporter for ZipExporter {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn export(&self, archive: &Archive, out: &mut dyn Write) -> ArchiveResult<u64> {
        let entries = collect_entries(archive)?;
        if entries.len() > u16::MAX as usize {
            return Err(ArchiveError::Export(format!(
                "{} entries exceed the zip32 limit",
                entries.len()
            )));
        }

        let mut buf = Vec::new();
        let mut cd = Vec::new();

        for entry in &entries {
            let name = entry.name.as_bytes();
            let payload = entry.data.as_deref().unwrap_or(&[]);
            let (method, data) = if entry.is_directory() {
                (METHOD_STORED, Vec::new())
            } else {
                self.compress(payload)?
            };

            let crc = crc32fast::hash(payload);
            let compressed_size = fit_u32(data.len(), &entry.name)?;
            let size = fit_u32(payload.len(), &entry.name)?;
            let name_len = u16::try_from(name.len())
                .map_err(|_| ArchiveError::Export(format!("entry name too long: {}", entry.name)))?;
            let local_offset = fit_u32(buf.len(), &entry.name)?;
            let external_attrs = if entry.is_directory() { ATTR_DIRECTORY } else { 0 };

            put_u32(&mut buf, LOCAL_HEADER_SIG);
            put_u16(&mut buf, VERSION);
            put_u16(&mut buf, 0);
            put_u16(&mut buf, method);
            put_u16(&mut buf, 0);
            put_u16(&mut buf, DOS_DATE);
            put_u32(&mut buf, crc);
            put_u32(&mut buf, compressed_size);
            put_u32(&mut buf, size);
            put_u16(&mut buf, name_len);
            put_u16(&mut buf, 0);
            buf.extend_from_slice(name);
            buf.extend_from_slice(&data);

            put_u32(&mut cd, CENTRAL_HEADER_SIG);
            put_u16(&mut cd, VERSION);
            put_u16(&mut cd, VERSION);
            put_u16(&mut cd, 0);
            put_u16(&mut cd, method);
            put_u16(&mut cd, 0);
            put_u16(&mut cd, DOS_DATE);
            put_u32(&mut cd, crc);
            put_u32(&mut cd, compressed_size);
            put_u32(&mut cd, size);
            put_u16(&mut cd, name_len);
            put_u16(&mut cd, 0);
            put_u16(&mut cd, 0);
            put_u16(&mut cd, 0);
            put_u16(&mut cd, 0);
            put_u32(&mut cd, external_attrs);
            put_u32(&mut cd, local_offset);
            cd.extend_from_slice(name);
        }

        let cd_start = fit_u32(buf.len(), "central directory")?;
        let cd_size = fit_u32(cd.len(), "central directory")?;
        buf.extend_from_slice(&cd);

        let count = u16::try_from(entries.len())
            .map_err(|_| ArchiveError::Export(format!("too many entries for zip: {}", entries.len())))?;
        put_u32(&mut buf, END_OF_CENTRAL_DIR_SIG);
        put_u16(&mut buf, 0);
        put_u16(&mut buf, 0);
        put_u16(&mut buf, count);
        put_u16(&mut buf, count);
        put_u32(&mut buf, cd_size);
        put_u32(&mut buf, cd_start);
        put_u16(&mut buf, 0);

        out.write_all(&buf)
            .map_err(|e| ArchiveError::Export(format!("zip write failed: {e}")))?;
        Ok(buf.len() as u64)
    }
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn fit_u32(len: usize, what: &str) -> ArchiveResult<u32> {
    u32::try_from(len).map_err(|_| ArchiveError::Export(format!("{what} exceeds the zip32 size limit")))
}
