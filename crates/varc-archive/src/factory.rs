//! Archive construction from an explicit configuration.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;
use varc_asset::ResourceAsset;
use varc_types::{ArchiveFormat, ArchiveName};

use crate::archive::Archive;
use crate::config::ArchiveConfig;
use crate::error::ArchiveResult;

/// Creates archives that share one [`ArchiveConfig`].
#[derive(Clone, Debug, Default)]
pub struct ArchiveFactory {
    config: Arc<ArchiveConfig>,
}

impl ArchiveFactory {
    pub fn new(config: ArchiveConfig) -> ArchiveResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Create an empty archive called `name`.
    ///
    /// The format follows the name's extension when it is a known one
    /// (`.jar` is a ZIP, `.tgz` a gzipped TAR) and the configured default
    /// otherwise. With `append_extension` set, a name without any extension
    /// gets the format's extension appended.
    pub fn create(&self, name: &str) -> ArchiveResult<Arc<Archive>> {
        let format = infer_format(name).unwrap_or(self.config.default_format);
        self.create_with_format(name, format)
    }

    /// Create an empty archive called `name` with an explicit format.
    pub fn create_with_format(&self, name: &str, format: ArchiveFormat) -> ArchiveResult<Arc<Archive>> {
        let name = ArchiveName::new(name)?;
        let name = if self.config.append_extension && name.extension().is_none() {
            ArchiveName::new(format!("{name}.{}", format.extension()))?
        } else {
            name
        };
        Ok(Archive::new(name, format, Arc::clone(&self.config)))
    }

    /// Create an archive with a generated unique name in the default format.
    pub fn create_unnamed(&self) -> ArchiveResult<Arc<Archive>> {
        let format = self.config.default_format;
        let name = format!("{}.{}", Uuid::now_v7(), format.extension());
        debug!(name = %name, "generated archive name");
        self.create_with_format(&name, format)
    }

    /// Locate `name` across the configured resource roots.
    pub fn resource_asset(&self, name: &str) -> ArchiveResult<ResourceAsset> {
        Ok(ResourceAsset::locate(name, &self.config.resource_roots())?)
    }
}

fn infer_format(name: &str) -> Option<ArchiveFormat> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".tar.gz") {
        return Some(ArchiveFormat::TarGz);
    }
    let (_, ext) = lower.rsplit_once('.')?;
    ext.parse().ok()
}
