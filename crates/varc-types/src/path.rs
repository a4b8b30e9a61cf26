//! Canonical archive paths.
//!
//! An [`ArchivePath`] is always absolute and always canonical: it starts with
//! `/`, has no trailing separator (except the root itself), no empty segments,
//! and no `.` or `..` segments. Construction never fails; noisy input is
//! normalized instead, so two paths naming the same location always compare
//! equal and hash identically.
//!
//! Combining paths concatenates canonical forms. The context is normalized on
//! its own before it is appended, so a `..` in a context can never climb out
//! of the base it is joined to. This keeps combination associative for every
//! input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Segment separator.
pub const SEPARATOR: char = '/';

const ROOT: &str = "/";

/// An immutable, absolute, hierarchical location inside an archive.
///
/// Ordering is lexicographic on the canonical string, which gives listings a
/// stable, deterministic order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ArchivePath(String);

impl ArchivePath {
    /// The root path, `/`.
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Normalize `context` into a canonical absolute path.
    ///
    /// An empty string is the root. A missing leading `/` is implied.
    pub fn new(context: &str) -> Self {
        Self(normalize(context))
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    /// The path one segment up, or `None` at the root.
    pub fn parent(&self) -> Option<ArchivePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// The last segment, or `None` at the root.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit(SEPARATOR).next()
    }

    /// Iterate the segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// All strict ancestors, nearest first, ending with the root.
    pub fn ancestors(&self) -> Vec<ArchivePath> {
        let mut out = Vec::new();
        let mut cursor = self.parent();
        while let Some(p) = cursor {
            cursor = p.parent();
            out.push(p);
        }
        out
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    ///
    /// Matching is segment-aware: `/lib/a.jar` is an ancestor of
    /// `/lib/a.jar/x` but not of `/lib/a.jarx`.
    pub fn is_ancestor_of(&self, other: &ArchivePath) -> bool {
        if self == other {
            return false;
        }
        if self.is_root() {
            return true;
        }
        other.0.starts_with(&self.0) && other.0.as_bytes()[self.0.len()] == b'/'
    }

    /// The remainder of `self` below `ancestor`, as an absolute path.
    ///
    /// Returns `None` unless `ancestor` is a strict ancestor of `self`.
    pub fn strip_ancestor(&self, ancestor: &ArchivePath) -> Option<ArchivePath> {
        if !ancestor.is_ancestor_of(self) {
            return None;
        }
        if ancestor.is_root() {
            return Some(self.clone());
        }
        Some(Self(self.0[ancestor.0.len()..].to_string()))
    }

    /// Append `context` below this path.
    pub fn join(&self, context: impl IntoArchivePath) -> ArchivePath {
        let context = context.into_archive_path();
        if self.is_root() {
            return context;
        }
        if context.is_root() {
            return self.clone();
        }
        Self(format!("{}{}", self.0, context.0))
    }
}

/// Collapse separators, drop `.` segments, resolve `..` segments, and prefix
/// a single `/`.
fn normalize(context: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in context.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return ROOT.to_string();
    }
    let mut out = String::with_capacity(context.len() + 1);
    for segment in segments {
        out.push(SEPARATOR);
        out.push_str(segment);
    }
    out
}

impl fmt::Debug for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArchivePath({})", self.0)
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for ArchivePath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArchivePath {
    fn from(context: &str) -> Self {
        Self::new(context)
    }
}

impl From<String> for ArchivePath {
    fn from(context: String) -> Self {
        Self::new(&context)
    }
}

impl From<&String> for ArchivePath {
    fn from(context: &String) -> Self {
        Self::new(context)
    }
}

impl From<Option<&str>> for ArchivePath {
    fn from(context: Option<&str>) -> Self {
        context.map(Self::new).unwrap_or_default()
    }
}

impl From<ArchivePath> for String {
    fn from(path: ArchivePath) -> Self {
        path.0
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Anything that can name a location: strings, optional strings, and paths.
pub trait IntoArchivePath {
    fn into_archive_path(self) -> ArchivePath;
}

impl IntoArchivePath for ArchivePath {
    fn into_archive_path(self) -> ArchivePath {
        self
    }
}

impl IntoArchivePath for &ArchivePath {
    fn into_archive_path(self) -> ArchivePath {
        self.clone()
    }
}

impl IntoArchivePath for &str {
    fn into_archive_path(self) -> ArchivePath {
        ArchivePath::new(self)
    }
}

impl IntoArchivePath for String {
    fn into_archive_path(self) -> ArchivePath {
        ArchivePath::new(&self)
    }
}

impl IntoArchivePath for &String {
    fn into_archive_path(self) -> ArchivePath {
        ArchivePath::new(self)
    }
}

impl IntoArchivePath for Option<&str> {
    fn into_archive_path(self) -> ArchivePath {
        ArchivePath::from(self)
    }
}

/// Factory for [`ArchivePath`]s.
///
/// Callers should build paths through here (or through [`ArchivePath::new`])
/// rather than formatting strings by hand, so every key is canonical.
///
/// ```
/// use varc_types::{ArchivePath, ArchivePaths};
///
/// let base = ArchivePaths::create("WEB-INF//lib/");
/// assert_eq!(base.as_str(), "/WEB-INF/lib");
///
/// let full = ArchivePaths::create_with(&base, "a.jar");
/// assert_eq!(full, ArchivePath::new("/WEB-INF/lib/a.jar"));
/// ```
pub struct ArchivePaths;

impl ArchivePaths {
    /// The root path.
    pub fn root() -> ArchivePath {
        ArchivePath::root()
    }

    /// A canonical path from a single context.
    pub fn create(context: impl IntoArchivePath) -> ArchivePath {
        context.into_archive_path()
    }

    /// A canonical path for `context` below `base`.
    pub fn create_with(base: impl IntoArchivePath, context: impl IntoArchivePath) -> ArchivePath {
        base.into_archive_path().join(context)
    }
}
