//! The [`Archive`] facade.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{const_mutex, Mutex};
use tracing::debug;
use uuid::Uuid;
use varc_asset::Asset;
use varc_store::{ContentStore, Entry, ListingStyle, NestedArchive, NodeTree};
use varc_types::{ArchiveFormat, ArchiveName, ArchivePath, IntoArchivePath};

use crate::asset::ArchiveAsset;
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::export;
use crate::filter::Filter;

/// Serializes every change to the nesting graph, so a cycle check and the
/// mount it guards act as one step across all archives.
static NESTING: Mutex<()> = const_mutex(());

/// An in-memory virtual archive.
///
/// Share it as `Arc<Archive>`; every operation takes `&self` and the content
/// store synchronizes internally. Builder-style operations return
/// `ArchiveResult<&Self>` so calls chain with `?`.
pub struct Archive {
    id: Uuid,
    name: ArchiveName,
    format: ArchiveFormat,
    config: Arc<ArchiveConfig>,
    store: ContentStore<Archive>,
}

impl Archive {
    /// Create an empty archive. Most callers go through
    /// [`ArchiveFactory`](crate::ArchiveFactory) instead.
    pub fn new(name: ArchiveName, format: ArchiveFormat, config: Arc<ArchiveConfig>) -> Arc<Self> {
        let id = Uuid::now_v7();
        debug!(archive = %name, %id, %format, "created archive");
        Arc::new(Self {
            id,
            name,
            format,
            config,
            store: ContentStore::new(),
        })
    }

    /// Identity of this archive instance. Archives with equal names stay
    /// distinct.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The archive's name; also the last segment of its mount point when
    /// nested.
    pub fn name(&self) -> &ArchiveName {
        &self.name
    }

    /// Container format used by [`export_to`](Self::export_to).
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Configuration shared with the factory that created this archive.
    pub fn config(&self) -> &Arc<ArchiveConfig> {
        &self.config
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// `true` when there are no direct entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // ---------------------------------------------------------------
    // Adding content
    // ---------------------------------------------------------------

    /// Place `asset` at `path`, replacing any asset already there.
    ///
    /// An archive-backed asset, such as one returned by [`get`](Self::get)
    /// for a mount point, mounts its archive at `path` exactly as
    /// [`add_archive`](Self::add_archive) would, including the cycle check.
    pub fn add(&self, path: impl IntoArchivePath, asset: Arc<dyn Asset>) -> ArchiveResult<&Self> {
        let path = path.into_archive_path();
        let nested = asset
            .as_any()
            .and_then(|any| any.downcast_ref::<ArchiveAsset>())
            .map(|nested| Arc::clone(nested.archive()));
        match nested {
            Some(archive) => {
                let _nesting = NESTING.lock();
                self.check_mountable(&archive)?;
                self.store.mount(&path, Arc::clone(&archive), asset)?;
                debug!(archive = %self.name, nested = %archive.name, mount = %path, "added nested archive");
            }
            None => {
                self.store.add(&path, asset)?;
            }
        }
        Ok(self)
    }

    /// Place `asset` at `path/name`.
    pub fn add_named(
        &self,
        path: impl IntoArchivePath,
        name: &str,
        asset: Arc<dyn Asset>,
    ) -> ArchiveResult<&Self> {
        let relative = ArchivePath::new(name);
        if relative.is_root() {
            return Err(ArchiveError::InvalidArgument(format!(
                "asset name {name:?} does not name a location"
            )));
        }
        self.add(path.into_archive_path().join(relative), asset)
    }

    /// Mount `archive` at `path/<archive name>`.
    ///
    /// Later changes to `archive` stay visible through this archive. Mounting
    /// an archive into itself, or into an archive it already contains at any
    /// depth, is rejected.
    pub fn add_archive(&self, path: impl IntoArchivePath, archive: &Arc<Archive>) -> ArchiveResult<&Self> {
        let _nesting = NESTING.lock();
        self.check_mountable(archive)?;
        let asset: Arc<dyn Asset> = Arc::new(ArchiveAsset::new(Arc::clone(archive)));
        let mount = self
            .store
            .add_nested(&path.into_archive_path(), Arc::clone(archive), asset)?;
        debug!(archive = %self.name, nested = %archive.name, mount = %mount, "added nested archive");
        Ok(self)
    }

    /// Store an explicit (possibly empty) directory.
    pub fn add_directory(&self, path: impl IntoArchivePath) -> ArchiveResult<&Self> {
        self.store.add_directory(&path.into_archive_path())?;
        Ok(self)
    }

    /// Store several directories. Stops at the first conflict.
    pub fn add_directories<I, P>(&self, paths: I) -> ArchiveResult<&Self>
    where
        I: IntoIterator<Item = P>,
        P: IntoArchivePath,
    {
        for path in paths {
            self.add_directory(path)?;
        }
        Ok(self)
    }

    // ---------------------------------------------------------------
    // Lookup and removal
    // ---------------------------------------------------------------

    /// The asset at `path`, resolving through nested archives.
    pub fn get(&self, path: impl IntoArchivePath) -> Option<Arc<dyn Asset>> {
        self.store.get(&path.into_archive_path())
    }

    /// The entry at `path`: a directory (stored or implied) or an asset.
    /// Resolves through nested archives.
    pub fn get_entry(&self, path: impl IntoArchivePath) -> Option<Entry> {
        self.store.get_entry(&path.into_archive_path())
    }

    /// Does `path` name an entry, directly or inside a nested archive?
    pub fn contains(&self, path: impl IntoArchivePath) -> bool {
        self.store.contains(&path.into_archive_path())
    }

    /// Remove the direct entry at `path`. Descendants are kept.
    pub fn delete(&self, path: impl IntoArchivePath) -> bool {
        self.store.delete(&path.into_archive_path())
    }

    /// Remove `path` and all its stored descendants.
    pub fn delete_tree(&self, path: impl IntoArchivePath) -> usize {
        self.store.delete_tree(&path.into_archive_path())
    }

    /// The nested archive whose mount point is an ancestor of `path`, and
    /// the rest of `path` inside it.
    pub fn resolve_nested(&self, path: impl IntoArchivePath) -> Option<(Arc<Archive>, ArchivePath)> {
        self.store.resolve_nested(&path.into_archive_path())
    }

    /// Mount points and the archives mounted there.
    pub fn nested_archives(&self) -> BTreeMap<ArchivePath, Arc<Archive>> {
        self.store.mounts()
    }

    // ---------------------------------------------------------------
    // Content views and merging
    // ---------------------------------------------------------------

    /// Snapshot of the direct entries. Content of nested archives is not
    /// flattened in.
    pub fn content(&self) -> BTreeMap<ArchivePath, Entry> {
        self.store.list()
    }

    /// Snapshot of the direct entries accepted by `filter`.
    pub fn content_filtered(&self, filter: &impl Filter) -> BTreeMap<ArchivePath, Entry> {
        self.store.list_filtered(|path| filter.include(path))
    }

    /// Copy every direct entry of `source` into this archive at the same path.
    pub fn merge(&self, source: &Archive) -> ArchiveResult<&Self> {
        self.merge_at(source, ArchivePath::root())
    }

    /// Copy every direct entry of `source` below `path`.
    pub fn merge_at(&self, source: &Archive, path: impl IntoArchivePath) -> ArchiveResult<&Self> {
        let _nesting = NESTING.lock();
        self.check_merge(source)?;
        self.store.merge(&source.store, &path.into_archive_path())?;
        Ok(self)
    }

    /// Copy the direct entries of `source` accepted by `filter` below `path`.
    ///
    /// `filter` runs while nesting changes are locked out, so it must not
    /// mount or merge archives itself.
    pub fn merge_filtered(
        &self,
        source: &Archive,
        path: impl IntoArchivePath,
        filter: &impl Filter,
    ) -> ArchiveResult<&Self> {
        let _nesting = NESTING.lock();
        self.check_merge(source)?;
        self.store
            .merge_filtered(&source.store, &path.into_archive_path(), |p| filter.include(p))?;
        Ok(self)
    }

    /// Move an entry and its stored descendants to a new path.
    pub fn move_entry(&self, source: impl IntoArchivePath, target: impl IntoArchivePath) -> ArchiveResult<&Self> {
        self.store
            .move_entry(&source.into_archive_path(), &target.into_archive_path())?;
        Ok(self)
    }

    /// A new archive named `name` holding the same assets and mounts.
    ///
    /// Assets are shared, not copied; mutating either archive afterwards does
    /// not affect the other's entry set.
    pub fn shallow_copy(&self, name: &str) -> ArchiveResult<Arc<Archive>> {
        let copy = Archive::new(ArchiveName::new(name)?, self.format, Arc::clone(&self.config));
        let _nesting = NESTING.lock();
        copy.store.merge(&self.store, &ArchivePath::root())?;
        Ok(copy)
    }

    // ---------------------------------------------------------------
    // Rendering and export
    // ---------------------------------------------------------------

    /// A tree view of the current content.
    pub fn tree(&self) -> NodeTree {
        NodeTree::build(&self.store)
    }

    /// Render the archive for display. See [`NodeTree::render`].
    pub fn listing(&self, style: ListingStyle) -> String {
        self.tree().render(self.name.as_str(), style)
    }

    /// Serialize into `out` using this archive's format. Returns the number
    /// of bytes written.
    pub fn export_to(&self, out: &mut dyn Write) -> ArchiveResult<u64> {
        export::exporter_for(self.format, &self.config).export(self, out)
    }

    /// Serialize into memory.
    pub fn to_bytes(&self) -> ArchiveResult<Bytes> {
        let mut buf = Vec::new();
        self.export_to(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    // ---------------------------------------------------------------
    // Cycle checks
    // ---------------------------------------------------------------

    fn check_mountable(&self, candidate: &Archive) -> ArchiveResult<()> {
        if candidate.id == self.id || candidate.reaches(self.id) {
            return Err(ArchiveError::InvalidArgument(format!(
                "cannot nest {} inside {}: it would contain itself",
                candidate.name, self.name
            )));
        }
        Ok(())
    }

    fn check_merge(&self, source: &Archive) -> ArchiveResult<()> {
        for nested in source.store.mounts().values() {
            self.check_mountable(nested)?;
        }
        Ok(())
    }

    /// Does any archive mounted below this one, at any depth, have `id`?
    fn reaches(&self, id: Uuid) -> bool {
        let mut seen = HashSet::new();
        let mut pending: Vec<Arc<Archive>> = self.store.mounts().into_values().collect();
        while let Some(next) = pending.pop() {
            if next.id == id {
                return true;
            }
            if seen.insert(next.id) {
                pending.extend(next.store.mounts().into_values());
            }
        }
        false
    }
}

impl NestedArchive for Archive {
    fn name(&self) -> &ArchiveName {
        &self.name
    }

    fn resolve(&self, path: &ArchivePath) -> Option<Entry> {
        self.store.get_entry(path)
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

impl fmt::Debug for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("format", &self.format)
            .field("entry_count", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ArchiveFactory;
    use crate::filter::Filters;
    use varc_asset::{ByteAsset, EmptyAsset, FileAsset, StreamAsset};
    use varc_store::StoreError;
    use varc_types::ArchivePaths;

    fn factory() -> ArchiveFactory {
        ArchiveFactory::default()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    fn archive(name: &str) -> Arc<Archive> {
        factory().create(name).unwrap()
    }

    fn bytes(content: &str) -> Arc<dyn Asset> {
        Arc::new(ByteAsset::from(content))
    }

    fn read(archive: &Archive, path: &str) -> Vec<u8> {
        archive.get(path).expect("asset should exist").read_to_vec().unwrap()
    }

    // -----------------------------------------------------------------------
    // Scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn named_add_and_nested_lookup() {
        let a = archive("a.jar");
        a.add_named(ArchivePath::root(), "test.properties", Arc::new(ByteAsset::new(vec![1u8, 2, 3])))
            .unwrap();
        assert!(a.contains(ArchivePath::new("/test.properties")));
        assert_eq!(read(&a, "/test.properties"), vec![1, 2, 3]);

        let b = archive("b.jar");
        b.add(ArchivePath::new("/nested.properties"), bytes("nested")).unwrap();
        a.add_archive(ArchivePath::new("/lib"), &b).unwrap();
        assert!(a.contains(format!("/lib/{}/nested.properties", b.name())));
        assert_eq!(read(&a, "/lib/b.jar/nested.properties"), b"nested");
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let a = archive("a.zip");
        a.add("/p", bytes("x")).unwrap();
        a.add("/p", bytes("y")).unwrap();
        assert_eq!(read(&a, "/p"), b"y");
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn exclusivity_leaves_archive_unchanged() {
        let a = archive("a.zip");
        a.add("/x/y.txt", bytes("y")).unwrap();
        let err = a.add("/x/y.txt/z.txt", bytes("z")).unwrap_err();
        assert!(matches!(err, ArchiveError::Store(StoreError::PathConflict { .. })));
        assert_eq!(read(&a, "/x/y.txt"), b"y");
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn chained_builder_calls() -> ArchiveResult<()> {
        let a = archive("chain.zip");
        a.add("/a", bytes("a"))?
            .add_directory("/empty")?
            .add_named("/dir", "b", bytes("b"))?;
        assert!(a.contains("/dir/b"));
        assert!(a.get_entry("/empty").unwrap().is_directory());
        Ok(())
    }

    #[test]
    fn add_named_rejects_empty_name() {
        let a = archive("a.zip");
        for name in ["", "/", ".", ".."] {
            assert!(matches!(
                a.add_named("/dir", name, bytes("x")),
                Err(ArchiveError::InvalidArgument(_))
            ));
        }
        assert!(a.is_empty());
    }

    #[test]
    fn string_and_path_arguments_agree() {
        let a = archive("a.zip");
        a.add(String::from("dir//file.txt/"), bytes("f")).unwrap();
        assert!(a.contains("/dir/file.txt"));
        assert!(a.contains(ArchivePaths::create_with("/dir", "file.txt")));
        assert!(a.contains(&ArchivePath::new("dir/./file.txt")));
    }

    #[test]
    fn unset_path_is_root() {
        let a = archive("a.zip");
        a.add_named(None::<&str>, "top.txt", bytes("t")).unwrap();
        assert!(a.contains("/top.txt"));
        assert!(matches!(
            a.add(None::<&str>, bytes("x")),
            Err(ArchiveError::Store(StoreError::PathConflict { .. }))
        ));
    }

    // -----------------------------------------------------------------------
    // Nesting
    // -----------------------------------------------------------------------

    #[test]
    fn two_levels_of_nesting() {
        init_tracing();
        let ear = archive("app.ear");
        let war = archive("web.war");
        let jar = archive("util.jar");
        jar.add("/org/Util.class", bytes("util")).unwrap();
        war.add_archive("/WEB-INF/lib", &jar).unwrap();
        ear.add_archive(ArchivePath::root(), &war).unwrap();

        let path = "/web.war/WEB-INF/lib/util.jar/org/Util.class";
        assert!(ear.contains(path));
        assert_eq!(read(&ear, path), jar.get("/org/Util.class").unwrap().read_to_vec().unwrap());

        let (nested, rest) = ear.resolve_nested(path).unwrap();
        assert_eq!(nested.name().as_str(), "web.war");
        assert_eq!(rest, ArchivePath::new("/WEB-INF/lib/util.jar/org/Util.class"));
    }

    #[test]
    fn nested_mutation_is_visible() {
        let outer = archive("outer.zip");
        let inner = archive("inner.zip");
        outer.add_archive("/lib", &inner).unwrap();
        inner.add("/late.txt", bytes("late")).unwrap();
        assert_eq!(read(&outer, "/lib/inner.zip/late.txt"), b"late");
    }

    #[test]
    fn readding_same_name_overwrites_mount() {
        let outer = archive("outer.zip");
        let first = archive("dup.jar");
        first.add("/one", bytes("1")).unwrap();
        let second = archive("dup.jar");
        second.add("/two", bytes("2")).unwrap();

        outer.add_archive("/lib", &first).unwrap();
        outer.add_archive("/lib", &second).unwrap();
        assert_eq!(outer.len(), 1);
        assert!(outer.contains("/lib/dup.jar/two"));
        assert!(!outer.contains("/lib/dup.jar/one"));
    }

    #[test]
    fn self_nesting_is_rejected() {
        let a = archive("a.zip");
        assert!(matches!(a.add_archive("/", &a), Err(ArchiveError::InvalidArgument(_))));

        let b = archive("b.zip");
        let c = archive("c.zip");
        a.add_archive("/", &b).unwrap();
        b.add_archive("/", &c).unwrap();
        assert!(matches!(c.add_archive("/", &a), Err(ArchiveError::InvalidArgument(_))));
        assert!(c.is_empty());
    }

    #[test]
    fn plain_add_of_archive_asset_mounts() {
        let outer = archive("outer.zip");
        let inner = archive("inner.jar");
        inner.add("/x.txt", bytes("x")).unwrap();
        outer.add_archive("/", &inner).unwrap();

        let copy = archive("copy.zip");
        let asset = outer.get("/inner.jar").unwrap();
        copy.add("/lib/renamed.jar", asset).unwrap();
        assert!(copy.store.mount_at(&ArchivePath::new("/lib/renamed.jar")).is_some());
        assert!(copy.nested_archives().contains_key(&ArchivePath::new("/lib/renamed.jar")));
        assert_eq!(read(&copy, "/lib/renamed.jar/x.txt"), b"x");
        assert_eq!(copy.nested_archives().len(), 1);
    }

    #[test]
    fn plain_add_cannot_nest_archive_in_itself() {
        let a = archive("a.zip");
        let b = archive("b.zip");
        a.add_archive("/", &b).unwrap();

        let wraps_a: Arc<dyn Asset> = Arc::new(ArchiveAsset::new(Arc::clone(&a)));
        assert!(matches!(a.add("/self.zip", Arc::clone(&wraps_a)), Err(ArchiveError::InvalidArgument(_))));
        assert!(matches!(b.add("/a.zip", wraps_a), Err(ArchiveError::InvalidArgument(_))));
        let wraps_b = a.get("/b.zip").unwrap();
        assert!(matches!(b.add("/b.zip", wraps_b), Err(ArchiveError::InvalidArgument(_))));

        assert!(!a.contains("/self.zip"));
        assert!(b.is_empty());
        assert!(a.to_bytes().is_ok());
    }

    #[test]
    fn concurrent_cross_nesting_admits_one_direction() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..50 {
            let a = archive("a.zip");
            let b = archive("b.zip");
            let barrier = Arc::new(Barrier::new(2));
            let spawn = |outer: Arc<Archive>, inner: Arc<Archive>| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    outer.add_archive("/", &inner).is_ok()
                })
            };
            let first = spawn(Arc::clone(&a), Arc::clone(&b));
            let second = spawn(Arc::clone(&b), Arc::clone(&a));
            let accepted = [first.join().unwrap(), second.join().unwrap()];

            assert_eq!(accepted.iter().filter(|&&ok| ok).count(), 1);
            assert!(a.to_bytes().is_ok());
            assert!(b.to_bytes().is_ok());
        }
    }

    #[test]
    fn merge_cannot_smuggle_a_cycle() {
        let a = archive("a.zip");
        let carrier = archive("carrier.zip");
        carrier.add_archive("/", &a).unwrap();
        assert!(matches!(a.merge(&carrier), Err(ArchiveError::InvalidArgument(_))));
        assert!(a.is_empty());
    }

    #[test]
    fn nested_archive_asset_exports() {
        let outer = archive("outer.zip");
        let inner = archive("inner.zip");
        inner.add("/x", bytes("x")).unwrap();
        outer.add_archive("/", &inner).unwrap();

        let asset = outer.get("/inner.zip").unwrap();
        assert_eq!(asset.kind(), varc_asset::AssetKind::Archive);
        let first = asset.read_to_vec().unwrap();
        assert_eq!(&first[..4], b"PK\x03\x04");

        inner.add("/y", bytes("y")).unwrap();
        let second = asset.read_to_vec().unwrap();
        assert!(second.len() > first.len());
    }

    // -----------------------------------------------------------------------
    // Delete / merge / move / copy
    // -----------------------------------------------------------------------

    #[test]
    fn delete_then_contains() {
        let a = archive("a.zip");
        a.add("/p", bytes("p")).unwrap();
        assert!(a.delete("/p"));
        assert!(!a.contains("/p"));
        assert!(!a.delete("/p"));
    }

    #[test]
    fn delete_tree_clears_subtree() {
        let a = archive("a.zip");
        a.add("/d/x", bytes("x")).unwrap();
        a.add("/d/y/z", bytes("z")).unwrap();
        assert_eq!(a.delete_tree("/d"), 2);
        assert!(a.is_empty());
    }

    #[test]
    fn merge_under_prefix() {
        init_tracing();
        let source = archive("s.zip");
        source.add("/p1", bytes("a1")).unwrap();
        source.add("/p2", bytes("a2")).unwrap();

        let target = archive("t.zip");
        target.add("/keep", bytes("k")).unwrap();
        target.merge_at(&source, "/base").unwrap();

        assert_eq!(read(&target, "/base/p1"), b"a1");
        assert_eq!(read(&target, "/base/p2"), b"a2");
        assert_eq!(read(&target, "/keep"), b"k");
    }

    #[test]
    fn merge_at_root_and_filtered() {
        let source = archive("s.zip");
        source.add("/org/A.class", bytes("a")).unwrap();
        source.add("/org/A.java", bytes("src")).unwrap();

        let target = archive("t.zip");
        target.merge(&source).unwrap();
        assert!(target.contains("/org/A.java"));

        let classes = archive("classes.zip");
        classes
            .merge_filtered(&source, "/WEB-INF/classes", &|p: &ArchivePath| {
                p.as_str().ends_with(".class")
            })
            .unwrap();
        assert!(classes.contains("/WEB-INF/classes/org/A.class"));
        assert!(!classes.contains("/WEB-INF/classes/org/A.java"));
    }

    #[test]
    fn content_views() {
        let a = archive("a.zip");
        a.add("/WEB-INF/web.xml", bytes("xml")).unwrap();
        a.add("/index.html", bytes("html")).unwrap();
        assert_eq!(a.content().len(), 2);

        let web_inf = a.content_filtered(&Filters::include_under("/WEB-INF"));
        assert_eq!(web_inf.len(), 1);
        assert!(web_inf.contains_key(&ArchivePath::new("/WEB-INF/web.xml")));
    }

    #[test]
    fn move_entry_relocates() {
        let a = archive("a.zip");
        a.add("/old/name.txt", bytes("n")).unwrap();
        a.move_entry("/old/name.txt", "/new/name.txt").unwrap();
        assert!(!a.contains("/old/name.txt"));
        assert_eq!(read(&a, "/new/name.txt"), b"n");
    }

    #[test]
    fn shallow_copy_is_independent() {
        let a = archive("a.zip");
        a.add("/x", bytes("x")).unwrap();
        let copy = a.shallow_copy("copy.zip").unwrap();
        assert_ne!(copy.id(), a.id());
        assert_eq!(copy.format(), a.format());
        copy.add("/y", bytes("y")).unwrap();
        assert!(!a.contains("/y"));
        assert_eq!(read(&copy, "/x"), b"x");
        assert!(matches!(a.shallow_copy(""), Err(ArchiveError::Type(_))));
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    #[test]
    fn file_asset_fails_lazily() {
        let a = archive("a.zip");
        a.add("/missing", Arc::new(FileAsset::new("/definitely/not/here.txt").unwrap()))
            .unwrap();
        assert!(a.contains("/missing"));
        assert!(a.get("/missing").unwrap().open_stream().is_err());
    }

    #[test]
    fn stream_asset_reads_once() {
        let a = archive("a.zip");
        a.add("/once", Arc::new(StreamAsset::new("once", &b"data"[..]))).unwrap();
        let asset = a.get("/once").unwrap();
        assert_eq!(asset.read_to_vec().unwrap(), b"data");
        assert!(asset.read_to_vec().is_err());
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    #[test]
    fn listing_styles() {
        let a = archive("test.jar");
        a.add("/META-INF/MANIFEST.MF", bytes("m")).unwrap();
        a.add("/placeholder", Arc::new(EmptyAsset)).unwrap();
        assert_eq!(a.listing(ListingStyle::Simple), "test.jar");
        assert_eq!(a.to_string(), "test.jar");
        assert_eq!(
            a.listing(ListingStyle::Verbose),
            "test.jar:\n/META-INF/\n/META-INF/MANIFEST.MF\n/placeholder"
        );
    }

    #[test]
    fn debug_shows_counts() {
        let a = archive("dbg.zip");
        a.add("/x", bytes("x")).unwrap();
        let debug = format!("{a:?}");
        assert!(debug.contains("dbg.zip"));
        assert!(debug.contains("entry_count: 1"));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn shared_across_threads() {
        use std::thread;

        let a = archive("shared.zip");
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let a = Arc::clone(&a);
                thread::spawn(move || {
                    for i in 0..25 {
                        a.add(format!("/t{t}/{i}"), bytes("v")).unwrap();
                        assert!(a.contains(format!("/t{t}/{i}")));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(a.len(), 100);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn segment() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9_.-]{0,7}".prop_filter("not a relative segment", |s| s != "." && s != "..")
        }

        fn relative_path() -> impl Strategy<Value = String> {
            prop::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("/"))
        }

        proptest! {
            #[test]
            fn add_get_round_trip(path in relative_path(), data in prop::collection::vec(any::<u8>(), 0..64)) {
                let a = archive("p.zip");
                a.add(path.as_str(), Arc::new(ByteAsset::new(data.clone()))).unwrap();
                prop_assert_eq!(read(&a, &path), data);
            }

            #[test]
            fn nested_lookup_matches_direct(base in relative_path(), inner_path in relative_path()) {
                let outer = archive("outer.zip");
                let inner = archive("inner.jar");
                inner.add(inner_path.as_str(), bytes(&inner_path)).unwrap();
                outer.add_archive(base.as_str(), &inner).unwrap();

                let through = ArchivePath::new(&base).join("inner.jar").join(inner_path.as_str());
                prop_assert!(outer.contains(&through));
                prop_assert_eq!(
                    outer.get(&through).unwrap().read_to_vec().unwrap(),
                    inner.get(inner_path.as_str()).unwrap().read_to_vec().unwrap()
                );
            }

            #[test]
            fn merge_places_everything_under_base(
                base in relative_path(),
                paths in prop::collection::btree_set(segment(), 1..6),
            ) {
                let source = archive("s.zip");
                for path in &paths {
                    source.add(path.as_str(), bytes(path)).unwrap();
                }
                let target = archive("t.zip");
                target.merge_at(&source, base.as_str()).unwrap();

                prop_assert_eq!(target.len(), paths.len());
                for path in &paths {
                    let merged = ArchivePath::new(&base).join(path.as_str());
                    prop_assert_eq!(read(&target, merged.as_str()), path.as_bytes().to_vec());
                }
            }
        }
    }
}
