//! TAR writers.
//!
//! Minimal ustar headers with stable metadata. Names longer than 100 bytes
//! are preceded by a GNU `L` longname record.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use varc_types::ArchiveFormat;

use super::{collect_entries, ArchiveExporter, CountingWriter, ExportEntry};
use crate::archive::Archive;
use crate::error::{ArchiveError, ArchiveResult};

const BLOCK_LEN: usize = 512;
const NAME_FIELD_LEN: usize = 100;

/// Writes archives as uncompressed ustar.
#[derive(Clone, Copy, Debug, Default)]
pub struct TarExporter;

impl ArchiveExporter for TarExporter {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Tar
    }

    fn export(&self, archive: &Archive, out: &mut dyn Write) -> ArchiveResult<u64> {
        let entries = collect_entries(archive)?;
        let mut counter = CountingWriter::new(out);
        write_tar(&entries, &mut counter).map_err(tar_error)?;
        Ok(counter.written())
    }
}

/// Writes archives as gzip-compressed ustar.
#[derive(Clone, Copy, Debug)]
pub struct TarGzExporter {
    level: u32,
}

impl TarGzExporter {
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }
}

impl Default for TarGzExporter {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ArchiveExporter for TarGzExporter {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::TarGz
    }

    fn export(&self, archive: &Archive, out: &mut dyn Write) -> ArchiveResult<u64> {
        let entries = collect_entries(archive)?;
        let counter = CountingWriter::new(out);
        let mut encoder = GzEncoder::new(counter, Compression::new(self.level));
        write_tar(&entries, &mut encoder).map_err(tar_error)?;
        let counter = encoder.finish().map_err(tar_error)?;
        Ok(counter.written())
    }
}

fn tar_error(e: io::Error) -> ArchiveError {
    ArchiveError::Export(format!("tar write failed: {e}"))
}

fn write_tar(entries: &[ExportEntry], out: &mut impl Write) -> io::Result<()> {
    let mut header = [0u8; BLOCK_LEN];

    for entry in entries {
        let name = entry.name.as_bytes();
        if name.len() > NAME_FIELD_LEN {
            let mut long_name = name.to_vec();
            long_name.push(0);
            write_header(&mut header, b"././@LongLink", long_name.len() as u64, b'L', 0o644)?;
            out.write_all(&header)?;
            write_padded(out, &long_name)?;
        }

        let (typeflag, mode) = if entry.is_directory() {
            (b'5', 0o755)
        } else {
            (b'0', 0o644)
        };
        let payload = entry.data.as_deref().unwrap_or(&[]);
        write_header(&mut header, name, payload.len() as u64, typeflag, mode)?;
        out.write_all(&header)?;
        write_padded(out, payload)?;
    }

    out.write_all(&[0u8; BLOCK_LEN])?;
    out.write_all(&[0u8; BLOCK_LEN])?;
    out.flush()
}

fn write_padded(out: &mut impl Write, data: &[u8]) -> io::Result<()> {
    out.write_all(data)?;
    let rem = data.len() % BLOCK_LEN;
    if rem != 0 {
        out.write_all(&vec![0u8; BLOCK_LEN - rem])?;
    }
    Ok(())
}

/// Fill `buf` with a ustar header. Names over 100 bytes are truncated; the
/// caller emits a longname record first.
fn write_header(
    buf: &mut [u8; BLOCK_LEN],
    name: &[u8],
    size: u64,
    typeflag: u8,
    mode: u32,
) -> io::Result<()> {
    buf.fill(0);
    let name_len = name.len().min(NAME_FIELD_LEN);
    buf[0..name_len].copy_from_slice(&name[..name_len]);
    write_octal(&mut buf[100..108], mode as u64)?;
    write_octal(&mut buf[108..116], 0)?;
    write_octal(&mut buf[116..124], 0)?;
    write_octal(&mut buf[124..136], size)?;
    write_octal(&mut buf[136..148], 0)?;
    buf[148..156].fill(b' ');
    buf[156] = typeflag;
    buf[257..263].copy_from_slice(b"ustar\0");
    buf[263..265].copy_from_slice(b"00");

    let sum: u32 = buf.iter().map(|&b| b as u32).sum();
    let checksum = format!("{sum:06o}\0 ");
    buf[148..156].copy_from_slice(checksum.as_bytes());
    Ok(())
}

/// Zero-padded octal followed by a NUL, filling `field`. Fails if `value`
/// needs more digits than the field holds.
fn write_octal(field: &mut [u8], value: u64) -> io::Result<()> {
    let digits = field.len() - 1;
    if digits < 22 && value >> (3 * digits) != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("value {value} does not fit in a {digits}-digit octal field"),
        ));
    }
    let mut v = value;
    for slot in field[..digits].iter_mut().rev() {
        *slot = b'0' + (v & 7) as u8;
        v >>= 3;
    }
    field[digits] = 0;
    Ok(())
}
