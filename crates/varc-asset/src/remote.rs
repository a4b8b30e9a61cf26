//! URL-backed assets.

use std::fs::File;
use std::io::BufReader;

use tracing::debug;
use url::Url;

use crate::error::{AssetError, AssetResult};
use crate::traits::{Asset, AssetKind, AssetStream};

/// Content addressed by a URL.
///
/// `file:` URLs are read from disk; `http:` and `https:` URLs are fetched
/// with a blocking client. Nothing is fetched until a stream is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlAsset {
    url: Url,
}

impl UrlAsset {
    /// Wrap an already-parsed URL.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parse and wrap a URL string.
    pub fn parse(url: &str) -> AssetResult<Self> {
        if url.trim().is_empty() {
            return Err(AssetError::InvalidArgument("URL must be specified".into()));
        }
        let url = Url::parse(url)
            .map_err(|e| AssetError::InvalidArgument(format!("invalid URL {url:?}: {e}")))?;
        Ok(Self::new(url))
    }

    /// The wrapped URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn open_file(&self) -> AssetResult<AssetStream> {
        let path = self.url.to_file_path().map_err(|_| {
            AssetError::InvalidArgument(format!("not a local file URL: {}", self.url))
        })?;
        let file = File::open(&path).map_err(|e| AssetError::io(self.url.to_string(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_http(&self) -> AssetResult<AssetStream> {
        debug!(url = %self.url, "fetching url asset");
        let response = reqwest::blocking::get(self.url.clone())
            .and_then(|r| r.error_for_status())
            .map_err(|e| AssetError::Http {
                url: self.url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Box::new(response))
    }
}

impl Asset for UrlAsset {
    fn open_stream(&self) -> AssetResult<AssetStream> {
        match self.url.scheme() {
            "file" => self.open_file(),
            "http" | "https" => self.open_http(),
            other => Err(AssetError::UnsupportedScheme(other.to_string())),
        }
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Url
    }
}

impl From<Url> for UrlAsset {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_malformed_url_is_invalid() {
        assert!(matches!(UrlAsset::parse(""), Err(AssetError::InvalidArgument(_))));
        assert!(matches!(
            UrlAsset::parse("not a url"),
            Err(AssetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn file_url_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.txt");
        std::fs::write(&path, b"via url").unwrap();

        let url = Url::from_file_path(&path).unwrap();
        let asset = UrlAsset::new(url);
        assert_eq!(asset.read_to_vec().unwrap(), b"via url");
        assert_eq!(asset.kind(), AssetKind::Url);
    }

    #[test]
    fn missing_file_url_fails_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("gone.txt")).unwrap();
        let asset = UrlAsset::new(url);
        assert!(matches!(asset.open_stream(), Err(AssetError::Io { .. })));
    }

    #[test]
    fn unsupported_scheme() {
        let asset = UrlAsset::parse("ftp://example.com/a.txt").unwrap();
        assert!(matches!(
            asset.open_stream(),
            Err(AssetError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }
}
