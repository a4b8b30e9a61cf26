//! Derived tree view over a store snapshot.
//!
//! A [`NodeTree`] is rebuilt from scratch whenever a hierarchy is needed;
//! the [`ContentStore`] stays authoritative. Directories that are only
//! implied by a stored descendant still get a node, so every non-root node
//! has its parent in the tree.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use varc_asset::Asset;
use varc_types::ArchivePath;

use crate::entry::Entry;
use crate::store::ContentStore;
use crate::traits::NestedArchive;

/// One position in the tree: a path, an optional asset, and the paths of its
/// children.
///
/// A node without an asset is a directory. Nodes compare and hash by path
/// only.
#[derive(Clone)]
pub struct Node {
    path: ArchivePath,
    asset: Option<Arc<dyn Asset>>,
    children: Vec<ArchivePath>,
}

impl Node {
    /// A directory node.
    pub fn directory(path: ArchivePath) -> Self {
        Self {
            path,
            asset: None,
            children: Vec::new(),
        }
    }

    /// An asset node.
    pub fn asset(path: ArchivePath, asset: Arc<dyn Asset>) -> Self {
        Self {
            path,
            asset: Some(asset),
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &ArchivePath {
        &self.path
    }

    pub fn content(&self) -> Option<&Arc<dyn Asset>> {
        self.asset.as_ref()
    }

    pub fn is_directory(&self) -> bool {
        self.asset.is_none()
    }

    /// Child paths in insertion order.
    pub fn children(&self) -> &[ArchivePath] {
        &self.children
    }

    /// Add a child. Returns `false` if it was already present.
    pub fn add_child(&mut self, child: ArchivePath) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Remove a child. Returns `false` if it was not present.
    pub fn remove_child(&mut self, child: &ArchivePath) -> bool {
        match self.children.iter().position(|c| c == child) {
            Some(idx) => {
                self.children.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path)
            .field("directory", &self.is_directory())
            .field("children", &self.children.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// How [`NodeTree::render`] prints a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListingStyle {
    /// The archive name only.
    #[default]
    Simple,
    /// The archive name, then every path one per line.
    Verbose,
}

/// Hierarchy of [`Node`]s keyed by path. Always contains the root.
#[derive(Clone, Debug)]
pub struct NodeTree {
    nodes: BTreeMap<ArchivePath, Node>,
}

impl NodeTree {
    /// A tree holding only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ArchivePath::root(), Node::directory(ArchivePath::root()));
        Self { nodes }
    }

    /// Build a tree from a listing of direct entries.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a ArchivePath, &'a Entry)>,
    {
        let mut tree = Self::new();
        for (path, entry) in entries {
            tree.insert(path.clone(), entry.asset().cloned());
        }
        tree
    }

    /// Build a tree from a snapshot of `store`.
    pub fn build<M: NestedArchive + ?Sized>(store: &ContentStore<M>) -> Self {
        Self::from_entries(&store.list())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[&ArchivePath::root()]
    }

    pub fn get(&self, path: &ArchivePath) -> Option<&Node> {
        self.nodes.get(path)
    }

    /// The child nodes of `path`, in insertion order.
    pub fn children(&self, path: &ArchivePath) -> Vec<&Node> {
        self.nodes
            .get(path)
            .map(|node| node.children.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default()
    }

    /// Add or replace the node at `path`, creating directory nodes for every
    /// missing ancestor.
    pub fn insert(&mut self, path: ArchivePath, asset: Option<Arc<dyn Asset>>) {
        if path.is_root() {
            return;
        }
        let children = self
            .nodes
            .remove(&path)
            .map(|old| old.children)
            .unwrap_or_default();
        let node = Node {
            path: path.clone(),
            asset,
            children,
        };
        self.nodes.insert(path.clone(), node);

        let mut child = path;
        while let Some(parent) = child.parent() {
            let parent_node = self
                .nodes
                .entry(parent.clone())
                .or_insert_with(|| Node::directory(parent.clone()));
            if !parent_node.add_child(child) {
                break;
            }
            child = parent;
        }
    }

    /// Remove the node at `path` and everything below it. Returns how many
    /// nodes were removed. The root cannot be removed.
    pub fn remove(&mut self, path: &ArchivePath) -> usize {
        if path.is_root() || !self.nodes.contains_key(path) {
            return 0;
        }
        if let Some(parent) = path.parent().and_then(|p| self.nodes.get_mut(&p)) {
            parent.remove_child(path);
        }
        let mut removed = 0;
        let mut pending = vec![path.clone()];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Depth-first, pre-order traversal from the root. Siblings are visited
    /// in path order.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut children: Vec<&Node> =
                node.children.iter().filter_map(|c| self.nodes.get(c)).collect();
            children.sort_by(|a, b| b.path.cmp(&a.path));
            stack.extend(children);
        }
        out
    }

    /// Render a listing headed by `name`.
    ///
    /// Verbose output lists every non-root path in path order, one per line,
    /// with directories suffixed by `/`.
    pub fn render(&self, name: &str, style: ListingStyle) -> String {
        match style {
            ListingStyle::Simple => name.to_string(),
            ListingStyle::Verbose => {
                let mut lines = vec![format!("{name}:")];
                for (path, node) in &self.nodes {
                    if path.is_root() {
                        continue;
                    }
                    if node.is_directory() {
                        lines.push(format!("{path}/"));
                    } else {
                        lines.push(path.to_string());
                    }
                }
                lines.join("\n")
            }
        }
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}
