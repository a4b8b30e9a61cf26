//! Named resources located across ordered roots.
//!
//! A resource name is a relative, slash-separated name such as
//! `META-INF/beans.xml`. [`ResourceRoots`] holds the directories searched for
//! it, in priority order; the first root containing the name wins.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AssetError, AssetResult};
use crate::traits::{Asset, AssetKind, AssetStream};

/// Ordered list of directories searched for resources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceRoots {
    roots: Vec<PathBuf>,
}

impl ResourceRoots {
    /// An empty search list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root with lower priority than those already present.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// The roots, highest priority first.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if there are no roots to search.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find the first root containing `name` as a regular file.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(name))
            .find(|candidate| candidate.is_file())
    }
}

impl FromIterator<PathBuf> for ResourceRoots {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().collect(),
        }
    }
}

/// A resource resolved against [`ResourceRoots`].
///
/// Lookup happens at construction: a resource that is not present under any
/// root is a hard error, since callers expect it to exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceAsset {
    name: String,
    resolved: PathBuf,
}

impl ResourceAsset {
    /// Locate `name` under `roots`.
    pub fn locate(name: &str, roots: &ResourceRoots) -> AssetResult<Self> {
        let name = name.trim_start_matches('/');
        if name.is_empty() {
            return Err(AssetError::InvalidArgument("resource name must be specified".into()));
        }
        if name.split('/').any(|segment| segment == "..") {
            return Err(AssetError::InvalidArgument(format!(
                "resource name must not leave its root: {name}"
            )));
        }

        let resolved = roots.locate(name).ok_or_else(|| AssetError::ResourceNotFound {
            name: name.to_string(),
            searched: roots.len(),
        })?;
        debug!(name, resolved = %resolved.display(), "located resource");

        Ok(Self {
            name: name.to_string(),
            resolved,
        })
    }

    /// The resource name, without a leading separator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the name resolved to.
    pub fn resolved(&self) -> &Path {
        &self.resolved
    }
}

impl Asset for ResourceAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        let file = File::open(&self.resolved).map_err(|e| AssetError::io(self.name.clone(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, name: &str, content: &[u8]) {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn first_root_wins() {
        let high = tempfile::tempdir().unwrap();
        let low = tempfile::tempdir().unwrap();
        write(high.path(), "conf/app.properties", b"high");
        write(low.path(), "conf/app.properties", b"low");

        let roots = ResourceRoots::new().with_root(high.path()).with_root(low.path());
        let asset = ResourceAsset::locate("/conf/app.properties", &roots).unwrap();
        assert_eq!(asset.name(), "conf/app.properties");
        assert_eq!(asset.read_to_vec().unwrap(), b"high");
    }

    #[test]
    fn falls_through_to_later_roots() {
        let high = tempfile::tempdir().unwrap();
        let low = tempfile::tempdir().unwrap();
        write(low.path(), "only-low.txt", b"low");

        let roots: ResourceRoots = vec![high.path().to_path_buf(), low.path().to_path_buf()]
            .into_iter()
            .collect();
        let asset = ResourceAsset::locate("only-low.txt", &roots).unwrap();
        assert_eq!(asset.read_to_vec().unwrap(), b"low");
    }

    #[test]
    fn missing_resource_fails_eagerly() {
        let root = tempfile::tempdir().unwrap();
        let roots = ResourceRoots::new().with_root(root.path());
        let err = ResourceAsset::locate("nope.txt", &roots).unwrap_err();
        assert!(matches!(
            err,
            AssetError::ResourceNotFound { ref name, searched: 1 } if name == "nope.txt"
        ));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let roots = ResourceRoots::new();
        assert!(matches!(
            ResourceAsset::locate("", &roots),
            Err(AssetError::InvalidArgument(_))
        ));
        assert!(matches!(
            ResourceAsset::locate("../etc/passwd", &roots),
            Err(AssetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn directories_are_not_resources() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("dir")).unwrap();
        let roots = ResourceRoots::new().with_root(root.path());
        assert!(ResourceAsset::locate("dir", &roots).is_err());
    }
}
