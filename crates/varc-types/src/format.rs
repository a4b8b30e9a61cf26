use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Stream format an archive serializes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
    /// ZIP container (the default).
    #[default]
    Zip,
    /// Uncompressed POSIX ustar.
    Tar,
    /// Gzip-compressed ustar.
    TarGz,
}

impl ArchiveFormat {
    /// Conventional file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }

    /// All supported formats.
    pub fn all() -> [ArchiveFormat; 3] {
        [Self::Zip, Self::Tar, Self::TarGz]
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zip" | "jar" | "war" | "ear" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            "tar.gz" | "tgz" | "tar-gz" => Ok(Self::TarGz),
            other => Err(TypeError::UnknownFormat(other.to_string())),
        }
    }
}
