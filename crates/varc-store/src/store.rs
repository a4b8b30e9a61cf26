//! The [`ContentStore`]: path → entry map plus the nested-archive mount index.
//!
//! Both maps sit behind their own `RwLock`. Writers always take the entry
//! lock before the mount lock. Readers never hold either lock while calling
//! into a nested archive.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};
use varc_asset::Asset;
use varc_types::ArchivePath;

use crate::entry::Entry;
use crate::error::{ConflictKind, StoreError, StoreResult};
use crate::traits::NestedArchive;

/// The authoritative content of an archive.
///
/// `M` is the archive type that can be mounted; resolution into a mounted
/// archive goes through [`NestedArchive::resolve`].
pub struct ContentStore<M: ?Sized = dyn NestedArchive> {
    entries: RwLock<BTreeMap<ArchivePath, Entry>>,
    mounts: RwLock<BTreeMap<ArchivePath, Arc<M>>>,
}

impl<M: NestedArchive + ?Sized> ContentStore<M> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            mounts: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the store has no direct entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Place `asset` at `path`, replacing any asset already there.
    ///
    /// Fails with [`StoreError::PathConflict`] if `path` is the root, has
    /// stored descendants, or lies below an asset. On failure the store is
    /// unchanged. Replacing a mount point with a plain asset drops the mount.
    pub fn add(&self, path: &ArchivePath, asset: Arc<dyn Asset>) -> StoreResult<&Self> {
        let mut entries = self.entries.write();
        check_leaf(&entries, path)?;
        let replaced = entries.insert(path.clone(), Entry::Asset(asset));
        if replaced.is_some() {
            self.mounts.write().remove(path);
        }
        debug!(path = %path, replaced = replaced.is_some(), "added asset");
        Ok(self)
    }

    /// Store an explicit directory marker at `path`.
    ///
    /// A no-op if `path` is the root or already a directory. Fails if `path`
    /// or one of its ancestors is an asset.
    pub fn add_directory(&self, path: &ArchivePath) -> StoreResult<&Self> {
        if path.is_root() {
            return Ok(self);
        }
        let mut entries = self.entries.write();
        check_directory(&entries, path)?;
        if !entries.contains_key(path) {
            entries.insert(path.clone(), Entry::Directory);
            debug!(path = %path, "added directory");
        }
        Ok(self)
    }

    /// Mount `archive` below `path`, at `path/<archive name>`.
    ///
    /// `asset` is the archive-backed asset stored at the mount point; the
    /// archive itself is recorded in the mount index so lookups below the
    /// mount point resolve inside it. Returns the mount point.
    pub fn add_nested(
        &self,
        path: &ArchivePath,
        archive: Arc<M>,
        asset: Arc<dyn Asset>,
    ) -> StoreResult<ArchivePath> {
        let mount = path.join(archive.name().as_str());
        self.mount(&mount, archive, asset)?;
        Ok(mount)
    }

    /// Mount `archive` exactly at `mount`, storing `asset` there.
    ///
    /// Same placement rules as [`add`](Self::add).
    pub fn mount(&self, mount: &ArchivePath, archive: Arc<M>, asset: Arc<dyn Asset>) -> StoreResult<()> {
        let mut entries = self.entries.write();
        check_leaf(&entries, mount)?;
        entries.insert(mount.clone(), Entry::Asset(asset));
        self.mounts.write().insert(mount.clone(), archive);
        debug!(mount = %mount, "mounted nested archive");
        Ok(())
    }

    /// Remove the direct entry at `path`.
    ///
    /// Returns `true` if an entry was removed. Only the named key is removed:
    /// stored descendants stay in place, paths only implied by descendants
    /// are not keys, and a mounted archive's own content is never touched
    /// (only its mount registration goes away).
    pub fn delete(&self, path: &ArchivePath) -> bool {
        let mut entries = self.entries.write();
        let removed = entries.remove(path).is_some();
        if removed {
            self.mounts.write().remove(path);
            debug!(path = %path, "deleted entry");
        }
        removed
    }

    /// Remove `path` and every stored descendant. Returns how many entries
    /// were removed.
    pub fn delete_tree(&self, path: &ArchivePath) -> usize {
        let mut entries = self.entries.write();
        let doomed: Vec<ArchivePath> = entries
            .keys()
            .filter(|k| *k == path || path.is_ancestor_of(k))
            .cloned()
            .collect();
        let mut mounts = self.mounts.write();
        for key in &doomed {
            entries.remove(key);
            mounts.remove(key);
        }
        debug!(path = %path, removed = doomed.len(), "deleted tree");
        doomed.len()
    }

    /// Move the entry at `source`, and every stored descendant, to `target`.
    ///
    /// All-or-nothing: if any moved entry would conflict at its new location
    /// the store is restored and the conflict returned.
    pub fn move_entry(&self, source: &ArchivePath, target: &ArchivePath) -> StoreResult<&Self> {
        if source == target {
            return Ok(self);
        }
        let mut entries = self.entries.write();
        if !entries.contains_key(source) {
            return Err(StoreError::NotFound(source.clone()));
        }

        let subtree: Vec<(ArchivePath, Entry)> = entries
            .iter()
            .filter(|(k, _)| *k == source || source.is_ancestor_of(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (old, _) in &subtree {
            entries.remove(old);
        }

        let mut placed: Vec<(ArchivePath, ArchivePath, Option<Entry>)> =
            Vec::with_capacity(subtree.len());
        let mut rejected = None;
        for (old, entry) in &subtree {
            let new = relocate(old, source, target);
            let check = match entry {
                Entry::Directory => check_directory(&entries, &new),
                Entry::Asset(_) => check_leaf(&entries, &new),
            };
            if let Err(e) = check {
                rejected = Some(e);
                break;
            }
            let previous = entries.insert(new.clone(), entry.clone());
            placed.push((old.clone(), new, previous));
        }

        if let Some(e) = rejected {
            for (_, new, previous) in placed.into_iter().rev() {
                match previous {
                    Some(previous) => entries.insert(new, previous),
                    None => entries.remove(&new),
                };
            }
            entries.extend(subtree);
            debug!(source = %source, target = %target, error = %e, "move rejected");
            return Err(e);
        }

        let mut mounts = self.mounts.write();
        for (_, new, previous) in &placed {
            if previous.is_some() {
                mounts.remove(new);
            }
        }
        for (old, new, _) in &placed {
            if let Some(archive) = mounts.remove(old) {
                mounts.insert(new.clone(), archive);
            }
        }
        debug!(source = %source, target = %target, moved = placed.len(), "moved entry");
        Ok(self)
    }

    /// Copy every direct entry of `source` into this store below `under`.
    ///
    /// Each entry is re-added with the usual exclusivity checks, so the merge
    /// stops at the first conflict; entries merged before it stay merged.
    /// Mount registrations travel with their entries.
    pub fn merge(&self, source: &ContentStore<M>, under: &ArchivePath) -> StoreResult<&Self> {
        self.merge_filtered(source, under, |_| true)
    }

    /// Like [`merge`](Self::merge), but only entries whose source path
    /// satisfies `filter` are copied.
    pub fn merge_filtered<F>(
        &self,
        source: &ContentStore<M>,
        under: &ArchivePath,
        filter: F,
    ) -> StoreResult<&Self>
    where
        F: Fn(&ArchivePath) -> bool,
    {
        let entries = source.list();
        let mounts = source.mounts();
        let mut merged = 0usize;

        for (path, entry) in entries {
            if !filter(&path) {
                continue;
            }
            let target = under.join(&path);
            match entry {
                Entry::Directory => {
                    self.add_directory(&target)?;
                }
                Entry::Asset(asset) => match mounts.get(&path) {
                    Some(archive) => self.mount(&target, Arc::clone(archive), asset)?,
                    None => {
                        self.add(&target, asset)?;
                    }
                },
            }
            merged += 1;
        }

        debug!(under = %under, merged, "merged content");
        Ok(self)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Look up the entry at `path`, resolving through mounted archives.
    ///
    /// The root always resolves to a directory.
    pub fn get_entry(&self, path: &ArchivePath) -> Option<Entry> {
        if let Some(entry) = self.entries.read().get(path) {
            return Some(entry.clone());
        }
        if path.is_root() {
            return Some(Entry::Directory);
        }
        let (archive, remainder) = self.resolve_nested(path)?;
        trace!(path = %path, nested = %archive.name(), remainder = %remainder, "resolving through mount");
        archive.resolve(&remainder)
    }

    /// Look up the asset at `path`. Directories and misses yield `None`.
    pub fn get(&self, path: &ArchivePath) -> Option<Arc<dyn Asset>> {
        self.get_entry(path).and_then(Entry::into_asset)
    }

    /// Returns `true` if `path` is stored here or resolves inside a mounted
    /// archive.
    pub fn contains(&self, path: &ArchivePath) -> bool {
        self.get_entry(path).is_some()
    }

    /// Find the mounted archive whose mount point is an ancestor of `path`,
    /// and the remainder of `path` below it.
    ///
    /// Nothing can be stored below an asset, so at most one mount point is
    /// an ancestor of any path.
    pub fn resolve_nested(&self, path: &ArchivePath) -> Option<(Arc<M>, ArchivePath)> {
        let mounts = self.mounts.read();
        if mounts.is_empty() {
            return None;
        }
        path.ancestors().into_iter().find_map(|ancestor| {
            let archive = mounts.get(&ancestor)?;
            let remainder = path.strip_ancestor(&ancestor)?;
            Some((Arc::clone(archive), remainder))
        })
    }

    /// The archive mounted exactly at `path`, if any.
    pub fn mount_at(&self, path: &ArchivePath) -> Option<Arc<M>> {
        self.mounts.read().get(path).cloned()
    }

    /// Point-in-time copy of the direct entries. Nested content is not
    /// flattened in.
    pub fn list(&self) -> BTreeMap<ArchivePath, Entry> {
        self.entries.read().clone()
    }

    /// Point-in-time copy of the direct entries whose path satisfies `filter`.
    pub fn list_filtered<F>(&self, filter: F) -> BTreeMap<ArchivePath, Entry>
    where
        F: Fn(&ArchivePath) -> bool,
    {
        self.entries
            .read()
            .iter()
            .filter(|(k, _)| filter(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Point-in-time copy of the mount index.
    pub fn mounts(&self) -> BTreeMap<ArchivePath, Arc<M>> {
        self.mounts.read().clone()
    }
}

impl<M: NestedArchive + ?Sized> Default for ContentStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ?Sized> fmt::Debug for ContentStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStore")
            .field("entry_count", &self.entries.read().len())
            .field("mount_count", &self.mounts.read().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Exclusivity checks
// ---------------------------------------------------------------------------

/// Can an asset be placed at `path`?
fn check_leaf(entries: &BTreeMap<ArchivePath, Entry>, path: &ArchivePath) -> StoreResult<()> {
    if path.is_root() {
        return Err(conflict(path, path, ConflictKind::Root));
    }
    if let Some(child) = first_descendant(entries, path) {
        return Err(conflict(path, child, ConflictKind::HasDescendants));
    }
    check_ancestors(entries, path)
}

/// Can a directory marker be placed at `path`?
fn check_directory(entries: &BTreeMap<ArchivePath, Entry>, path: &ArchivePath) -> StoreResult<()> {
    if let Some(Entry::Asset(_)) = entries.get(path) {
        return Err(conflict(path, path, ConflictKind::OccupiedByAsset));
    }
    check_ancestors(entries, path)
}

fn check_ancestors(entries: &BTreeMap<ArchivePath, Entry>, path: &ArchivePath) -> StoreResult<()> {
    for ancestor in path.ancestors() {
        if let Some(Entry::Asset(_)) = entries.get(&ancestor) {
            return Err(conflict(path, &ancestor, ConflictKind::AncestorIsAsset));
        }
    }
    Ok(())
}

/// Every descendant of `path` sorts into the contiguous run of keys that
/// start with `path`'s string form, right after `path` itself.
fn first_descendant<'a>(
    entries: &'a BTreeMap<ArchivePath, Entry>,
    path: &ArchivePath,
) -> Option<&'a ArchivePath> {
    entries
        .range(path.clone()..)
        .map(|(k, _)| k)
        .take_while(|k| k.as_str().starts_with(path.as_str()))
        .find(|k| path.is_ancestor_of(k))
}

fn conflict(path: &ArchivePath, conflicting: &ArchivePath, kind: ConflictKind) -> StoreError {
    debug!(path = %path, conflicting = %conflicting, %kind, "rejected placement");
    StoreError::PathConflict {
        path: path.clone(),
        conflicting: conflicting.clone(),
        kind,
    }
}

fn relocate(old: &ArchivePath, source: &ArchivePath, target: &ArchivePath) -> ArchivePath {
    match old.strip_ancestor(source) {
        Some(rest) => target.join(rest),
        None => target.clone(),
    }
}
