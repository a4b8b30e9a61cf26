use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use varc_asset::ResourceRoots;
use varc_types::ArchiveFormat;

use crate::error::{ArchiveError, ArchiveResult};

/// How ZIP entries are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZipCompression {
    /// No compression (method 0).
    Stored,
    /// Raw deflate (method 8).
    #[default]
    Deflate,
}

/// Configuration shared by every archive a factory creates.
///
/// There is no process-wide default: build one (or take
/// [`ArchiveConfig::default`]) and hand it to an
/// [`ArchiveFactory`](crate::ArchiveFactory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Format for archives whose name does not imply one.
    pub default_format: ArchiveFormat,
    /// ZIP entry storage.
    pub zip_compression: ZipCompression,
    /// Deflate/gzip level, 0-9.
    pub compression_level: u32,
    /// Append the format extension to names that have none.
    pub append_extension: bool,
    /// Search roots for resource assets, in priority order.
    pub resource_roots: Vec<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            default_format: ArchiveFormat::Zip,
            zip_compression: ZipCompression::Deflate,
            compression_level: 6,
            append_extension: true,
            resource_roots: Vec::new(),
        }
    }
}

impl ArchiveConfig {
    /// Parse a TOML document. Missing keys take their default.
    pub fn from_toml_str(input: &str) -> ArchiveResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ArchiveError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Write as a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> ArchiveResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|e| ArchiveError::io(path, e))
    }

    pub fn to_toml_string(&self) -> ArchiveResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ArchiveResult<()> {
        if self.compression_level > 9 {
            return Err(ArchiveError::Config(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }

    /// The configured resource roots.
    pub fn resource_roots(&self) -> ResourceRoots {
        self.resource_roots.iter().cloned().collect()
    }

    /// A configuration that exports ZIP entries uncompressed.
    pub fn stored() -> Self {
        Self {
            zip_compression: ZipCompression::Stored,
            ..Default::default()
        }
    }
}
