//! Arena-backed menu tree.
//!
//! Nodes live in a flat arena owned by [`MenuTree`]; every level (the root
//! and each node's subtree) is an ordered list of `(key, NodeId)` pairs.
//! The walker hands out `&mut MenuNode` one node at a time, so visitors
//! mutate the live tree rather than a copy.
//!
//! Nodes are only ever created by the tree itself and attached to exactly
//! one level, which keeps the structure acyclic.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::link::{Access, MenuLink};
use crate::error::ToolbarResult;

/// Handle to a node inside a [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One level of a menu tree: keys in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Level {
    entries: Vec<(String, NodeId)>,
}

impl Level {
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, id)| *id)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert an entry, returning the node it replaced.
    ///
    /// An existing key keeps its position; a new key is appended.
    fn insert(&mut self, key: String, id: NodeId) -> Option<NodeId> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, id)),
            None => {
                self.entries.push((key, id));
                None
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<NodeId> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(k, id)| (k.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A menu tree element: link, access decision, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub link: MenuLink,
    pub access: Access,
    subtree: Level,
}

impl MenuNode {
    pub fn new(link: MenuLink) -> Self {
        Self {
            link,
            access: Access::Allowed,
            subtree: Level::default(),
        }
    }

    pub fn forbidden(mut self) -> Self {
        self.access = Access::Forbidden;
        self
    }

    pub fn plugin_id(&self) -> &str {
        self.link.plugin_id()
    }

    pub fn subtree(&self) -> &Level {
        &self.subtree
    }
}

/// A menu tree for one request.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
    root: Level,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tree from its JSON interchange form.
    pub fn from_json(json: &str) -> ToolbarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> ToolbarResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn root(&self) -> &Level {
        &self.root
    }

    /// Node by handle. Handles are only valid for the tree that issued them.
    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MenuNode {
        &mut self.nodes[id.0]
    }

    /// Root-level node by key.
    pub fn get(&self, key: &str) -> Option<&MenuNode> {
        self.root.get(key).map(|id| self.node(id))
    }

    /// Add (or replace) a root-level entry.
    pub fn insert_root(&mut self, key: impl Into<String>, node: MenuNode) -> NodeId {
        let id = self.alloc(node);
        self.root.insert(key.into(), id);
        id
    }

    /// Add (or replace) an entry in `parent`'s subtree.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        node: MenuNode,
    ) -> NodeId {
        let id = self.alloc(node);
        self.nodes[parent.0].subtree.insert(key.into(), id);
        id
    }

    fn alloc(&mut self, node: MenuNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.post_order().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Depth-first pre-order walk over every reachable node.
    ///
    /// `visit` runs before the node's subtree is read, so changes it makes
    /// to the node are visible to the rest of the walk and to the caller.
    pub fn walk<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str, &mut MenuNode),
    {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(String, NodeId)> = self.root.entries.iter().rev().cloned().collect();

        while let Some((key, id)) = stack.pop() {
            debug_assert!(
                !std::mem::replace(&mut visited[id.0], true),
                "menu tree node {key:?} reached twice"
            );

            let node = &mut self.nodes[id.0];
            visit(&key, node);
            stack.extend(node.subtree.entries.iter().rev().cloned());
        }
    }

    /// Reachable nodes with children listed before their parent.
    pub fn post_order(&self) -> Vec<(String, NodeId)> {
        let mut order = Vec::new();
        self.collect_post_order(&self.root, &mut order);
        order
    }

    fn collect_post_order(&self, level: &Level, order: &mut Vec<(String, NodeId)>) {
        for (key, id) in level.iter() {
            self.collect_post_order(&self.node(id).subtree, order);
            order.push((key.to_string(), id));
        }
    }

    /// Forbid every node whose link has `plugin_id`, at any depth.
    ///
    /// Returns how many nodes changed from allowed to forbidden.
    pub fn forbid_plugin(&mut self, plugin_id: &str) -> usize {
        let mut changed = 0;
        self.walk(|_, node| {
            if node.plugin_id() == plugin_id {
                if node.access.is_allowed() {
                    changed += 1;
                }
                node.access = Access::Forbidden;
            }
        });
        changed
    }

    /// Replace the root entry `key` with its children.
    ///
    /// Inaccessible children are dropped. A child whose key already exists
    /// at the root overwrites that entry in place. Returns the number of
    /// promoted children, or `None` when `key` is not a root entry.
    pub fn promote_subtree(&mut self, key: &str) -> Option<usize> {
        let id = self.root.get(key)?;
        let children = std::mem::take(&mut self.nodes[id.0].subtree);

        let mut promoted = 0;
        for (child_key, child) in children.entries {
            if self.nodes[child.0].link.is_inaccessible() {
                continue;
            }
            if let Some(replaced) = self.root.insert(child_key.clone(), child)
                && replaced != id
            {
                warn!(
                    key = %child_key,
                    expanded = %key,
                    "promoted menu item replaces an existing root item"
                );
            }
            promoted += 1;
        }

        self.root.remove(key);
        Some(promoted)
    }

    /// Copy of the tree without forbidden nodes (and their subtrees).
    pub fn prune_forbidden(&self) -> MenuTree {
        let mut pruned = MenuTree::new();
        let root = self.copy_allowed(&self.root, &mut pruned);
        pruned.root = root;
        pruned
    }

    fn copy_allowed(&self, level: &Level, into: &mut MenuTree) -> Level {
        let mut copied = Level::default();
        for (key, id) in level.iter() {
            let node = self.node(id);
            if !node.access.is_allowed() {
                continue;
            }
            let subtree = self.copy_allowed(&node.subtree, into);
            let copy = into.alloc(MenuNode {
                link: node.link.clone(),
                access: node.access,
                subtree,
            });
            copied.insert(key.to_string(), copy);
        }
        copied
    }

    /// Flatten a raw level into `into`.
    ///
    /// Entries of a bare group are spliced in place under
    /// `{group_key}.{entry_key}`, so nodes from different groups never
    /// replace each other. A grouped key that is still taken gets a `#n`
    /// suffix.
    fn build_level(&mut self, raw: RawLevel, group: Option<&str>, into: &mut Level) {
        for (key, entry) in raw.0 {
            let key = match group {
                Some(group) => format!("{group}.{key}"),
                None => key,
            };
            match entry {
                RawEntry::Node(node) => {
                    let id = self.build_node(node);
                    if group.is_some() {
                        into.insert(unused_key(into, key), id);
                    } else if into.insert(key.clone(), id).is_some() {
                        warn!(key = %key, "duplicate menu tree key, later entry wins");
                    }
                }
                RawEntry::Group(entries) => self.build_level(entries, Some(&key), into),
            }
        }
    }

    fn build_node(&mut self, raw: RawNode) -> NodeId {
        let mut subtree = Level::default();
        self.build_level(raw.subtree, None, &mut subtree);
        self.alloc(MenuNode {
            link: raw.link,
            access: raw.access,
            subtree,
        })
    }
}

/// `key`, or the first `key#n` not yet present in `level`.
fn unused_key(level: &Level, key: String) -> String {
    if !level.contains_key(&key) {
        return key;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{key}#{n}");
        if !level.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// -------------------------------------------------------------------------
// JSON interchange
// -------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawNode {
    link: MenuLink,
    #[serde(default)]
    access: Access,
    #[serde(default)]
    subtree: RawLevel,
}

/// An entry is either a node or a bare collection wrapping more entries.
enum RawEntry {
    Node(RawNode),
    Group(RawLevel),
}

impl<'de> Deserialize<'de> for RawEntry {
    /// Objects with a `link` member are nodes and must parse as one; other
    /// objects and arrays are groups.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        if value.as_object().is_some_and(|map| map.contains_key("link")) {
            return serde_json::from_value(value)
                .map(RawEntry::Node)
                .map_err(de::Error::custom);
        }
        if value.is_object() || value.is_array() {
            return RawLevel::deserialize(value)
                .map(RawEntry::Group)
                .map_err(de::Error::custom);
        }
        Err(de::Error::custom(format_args!(
            "expected a menu node or a group of menu nodes, found {value}"
        )))
    }
}

/// Entries of one level in input order. Array entries are keyed by index.
#[derive(Default)]
struct RawLevel(Vec<(String, RawEntry)>);

impl<'de> Deserialize<'de> for RawLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawLevelVisitor)
    }
}

struct RawLevelVisitor;

impl<'de> Visitor<'de> for RawLevelVisitor {
    type Value = RawLevel;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a menu tree level (object or array)")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawLevel, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, entry)) = map.next_entry::<String, RawEntry>()? {
            entries.push((key, entry));
        }
        Ok(RawLevel(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawLevel, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<RawEntry>()? {
            entries.push((entries.len().to_string(), entry));
        }
        Ok(RawLevel(entries))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawLevel, E> {
        Ok(RawLevel::default())
    }
}

impl<'de> Deserialize<'de> for MenuTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawLevel::deserialize(deserializer)?;
        let mut tree = MenuTree::new();
        let mut root = Level::default();
        tree.build_level(raw, None, &mut root);
        tree.root = root;
        Ok(tree)
    }
}

struct LevelView<'a> {
    tree: &'a MenuTree,
    level: &'a Level,
}

impl Serialize for LevelView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.level.len()))?;
        for (key, id) in self.level.iter() {
            map.serialize_entry(
                key,
                &NodeView {
                    tree: self.tree,
                    node: self.tree.node(id),
                },
            )?;
        }
        map.end()
    }
}

struct NodeView<'a> {
    tree: &'a MenuTree,
    node: &'a MenuNode,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("link", &self.node.link)?;
        map.serialize_entry("access", &self.node.access)?;
        map.serialize_entry(
            "subtree",
            &LevelView {
                tree: self.tree,
                level: &self.node.subtree,
            },
        )?;
        map.end()
    }
}

impl Serialize for MenuTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LevelView {
            tree: self,
            level: &self.root,
        }
        .serialize(serializer)
    }
}
