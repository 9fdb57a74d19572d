#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Shared fixtures for toolbar integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};

use editor_toolbar::menu::{Access, MenuTree, NodeId};

/// JSON for a statically defined link node.
pub fn link(plugin_id: &str, route: &str) -> Value {
    json!({"link": {"plugin_id": plugin_id, "definition": {"route_name": route}}})
}

/// JSON for a node with children.
pub fn parent(plugin_id: &str, route: &str, subtree: Value) -> Value {
    let mut node = link(plugin_id, route);
    node["subtree"] = subtree;
    node
}

/// JSON for an inaccessible placeholder link.
pub fn inaccessible(plugin_id: &str) -> Value {
    json!({"link": {"type": "inaccessible", "plugin_id": plugin_id}})
}

pub fn tree(value: Value) -> MenuTree {
    MenuTree::from_value(value).unwrap()
}

/// Access of every reachable node, keyed by tree path.
pub fn access_map(tree: &MenuTree) -> Vec<(String, Access)> {
    fn collect(
        tree: &MenuTree,
        prefix: &str,
        ids: Vec<(String, NodeId)>,
        out: &mut Vec<(String, Access)>,
    ) {
        for (key, id) in ids {
            let path = format!("{prefix}/{key}");
            let node = tree.node(id);
            out.push((path.clone(), node.access));
            let children = node
                .subtree()
                .iter()
                .map(|(k, id)| (k.to_string(), id))
                .collect();
            collect(tree, &path, children, out);
        }
    }

    let root = tree.root().iter().map(|(k, id)| (k.to_string(), id)).collect();
    let mut out = Vec::new();
    collect(tree, "", root, &mut out);
    out
}

/// Root-level node access by key.
pub fn root_access(tree: &MenuTree, key: &str) -> Access {
    tree.get(key).unwrap().access
}
