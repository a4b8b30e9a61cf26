//! Path predicates for filtered content views and merges.

use std::collections::BTreeSet;

use varc_types::{ArchivePath, IntoArchivePath};

/// Decides whether a path takes part in an operation.
pub trait Filter {
    fn include(&self, path: &ArchivePath) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&ArchivePath) -> bool,
{
    fn include(&self, path: &ArchivePath) -> bool {
        self(path)
    }
}

/// Accepts every path.
#[derive(Clone, Copy, Debug, Default)]
pub struct IncludeAll;

impl Filter for IncludeAll {
    fn include(&self, _path: &ArchivePath) -> bool {
        true
    }
}

/// Accepts exactly the listed paths.
#[derive(Clone, Debug, Default)]
pub struct IncludePaths {
    paths: BTreeSet<ArchivePath>,
}

impl Filter for IncludePaths {
    fn include(&self, path: &ArchivePath) -> bool {
        self.paths.contains(path)
    }
}

/// Accepts everything except the listed paths.
#[derive(Clone, Debug, Default)]
pub struct ExcludePaths {
    paths: BTreeSet<ArchivePath>,
}

impl Filter for ExcludePaths {
    fn include(&self, path: &ArchivePath) -> bool {
        !self.paths.contains(path)
    }
}

/// Accepts a path and everything below it.
#[derive(Clone, Debug)]
pub struct IncludeUnder {
    prefix: ArchivePath,
}

impl Filter for IncludeUnder {
    fn include(&self, path: &ArchivePath) -> bool {
        *path == self.prefix || self.prefix.is_ancestor_of(path)
    }
}

/// Constructors for the stock filters.
pub struct Filters;

impl Filters {
    pub fn include_all() -> IncludeAll {
        IncludeAll
    }

    pub fn include_paths<I, P>(paths: I) -> IncludePaths
    where
        I: IntoIterator<Item = P>,
        P: IntoArchivePath,
    {
        IncludePaths {
            paths: paths.into_iter().map(IntoArchivePath::into_archive_path).collect(),
        }
    }

    pub fn exclude_paths<I, P>(paths: I) -> ExcludePaths
    where
        I: IntoIterator<Item = P>,
        P: IntoArchivePath,
    {
        ExcludePaths {
            paths: paths.into_iter().map(IntoArchivePath::into_archive_path).collect(),
        }
    }

    pub fn include_under(prefix: impl IntoArchivePath) -> IncludeUnder {
        IncludeUnder {
            prefix: prefix.into_archive_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> ArchivePath {
        ArchivePath::new(s)
    }

    #[test]
    fn include_all_accepts_everything() {
        assert!(Filters::include_all().include(&p("/anything")));
        assert!(Filters::include_all().include(&ArchivePath::root()));
    }

    #[test]
    fn include_and_exclude_lists_normalize() {
        let include = Filters::include_paths(["a/b", "/c/"]);
        assert!(include.include(&p("/a/b")));
        assert!(include.include(&p("/c")));
        assert!(!include.include(&p("/a")));

        let exclude = Filters::exclude_paths(vec![p("/skip")]);
        assert!(!exclude.include(&p("/skip")));
        assert!(exclude.include(&p("/keep")));
    }

    #[test]
    fn include_under_is_segment_aware() {
        let under = Filters::include_under("/WEB-INF");
        assert!(under.include(&p("/WEB-INF")));
        assert!(under.include(&p("/WEB-INF/web.xml")));
        assert!(!under.include(&p("/WEB-INFO")));
    }

    #[test]
    fn closures_are_filters() {
        let classes = |path: &ArchivePath| path.as_str().ends_with(".class");
        assert!(classes.include(&p("/org/A.class")));
        assert!(!classes.include(&p("/org/A.java")));
    }
}
