use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::path::SEPARATOR;

/// A validated archive name such as `app.war` or `lib.jar`.
///
/// When an archive is nested inside another, its name becomes the final
/// segment of the mount point, so it must be a single, non-empty segment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArchiveName(String);

impl ArchiveName {
    /// Validate and wrap a name.
    pub fn new(name: impl Into<String>) -> TypeResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidName {
                name,
                reason: "name must not be empty".into(),
            });
        }
        if name.contains(SEPARATOR) {
            return Err(TypeError::InvalidName {
                name,
                reason: format!("name must not contain '{SEPARATOR}'"),
            });
        }
        if name == "." || name == ".." {
            return Err(TypeError::InvalidName {
                name,
                reason: "name must not be a relative segment".into(),
            });
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the last `.`, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
    }
}

impl fmt::Debug for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArchiveName({})", self.0)
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArchiveName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ArchiveName {
    type Error = TypeError;

    fn try_from(name: String) -> TypeResult<Self> {
        Self::new(name)
    }
}

impl TryFrom<&str> for ArchiveName {
    type Error = TypeError;

    fn try_from(name: &str) -> TypeResult<Self> {
        Self::new(name)
    }
}

impl From<ArchiveName> for String {
    fn from(name: ArchiveName) -> Self {
        name.0
    }
}
