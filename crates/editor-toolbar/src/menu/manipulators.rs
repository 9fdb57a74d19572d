//! Editor toolbar tree manipulators.
//!
//! Each manipulator rewrites a [`MenuTree`] in place according to a
//! [`ToolbarSettings`] snapshot. Nodes are never deleted: removing an item
//! forbids it, and the renderer drops forbidden nodes. Unknown plugin ids or
//! keys are not errors since editors may configure items a site lacks.

use serde_json::Value;
use tracing::debug;

use super::link::{
    Access, DefaultLinkFactory, LinkFactory, NO_LINK_ROUTE, PARENT_KEY, ROUTE_NAME_KEY,
};
use super::tree::MenuTree;
use crate::settings::{SettingsSource, ToolbarSettings};

/// Plugin ids of the items the access check toggles.
pub mod item_ids {
    /// Combined "content overview" item provided by the toolbar.
    pub const CONTENT_OVERVIEW: &str = "wienimal_editor_toolbar.content_overview";
    /// Combined "add content" item provided by the toolbar.
    pub const CONTENT_ADD: &str = "wienimal_editor_toolbar.content_add";
    /// Core taxonomy vocabulary listing.
    pub const TAXONOMY_VOCABULARY_COLLECTION: &str = "entity.taxonomy_vocabulary.collection";
    /// Admin toolbar's "add content" item.
    pub const ADMIN_TOOLBAR_ADD_CONTENT: &str = "admin_toolbar_tools.add_content";
    /// Admin toolbar's "add node" extra link.
    pub const ADMIN_TOOLBAR_NODE_ADD: &str = "admin_toolbar_tools.extra_links:node.add";
}

/// Rewrites menu trees for editorial users.
pub struct ToolbarManipulators {
    settings: ToolbarSettings,
    links: Box<dyn LinkFactory>,
}

impl ToolbarManipulators {
    pub fn new(settings: ToolbarSettings) -> Self {
        Self {
            settings,
            links: Box::new(DefaultLinkFactory),
        }
    }

    /// Snapshot `source` and build manipulators from it.
    pub fn from_source(source: &dyn SettingsSource) -> Self {
        Self::new(ToolbarSettings::load(source))
    }

    /// Use `factory` to build links rewritten by
    /// [`make_menu_items_not_clickable`](Self::make_menu_items_not_clickable).
    pub fn with_link_factory(mut self, factory: impl LinkFactory + 'static) -> Self {
        self.links = Box::new(factory);
        self
    }

    pub fn settings(&self) -> &ToolbarSettings {
        &self.settings
    }

    /// Run every manipulator in toolbar order.
    pub fn apply(&self, tree: &mut MenuTree) {
        self.check_custom_menu_items_access(tree);
        self.remove_menu_items(tree);
        self.expand_menu_items(tree);
        self.make_menu_items_not_clickable(tree);
        self.remove_empty_menu_items(tree);
    }

    /// Forbid every configured item, in configured order.
    pub fn remove_menu_items(&self, tree: &mut MenuTree) {
        for plugin_id in &self.settings.remove {
            self.remove_menu_item(tree, plugin_id);
        }
    }

    /// Forbid every node linking to `plugin_id`, at any depth.
    ///
    /// Returns the number of nodes that became forbidden.
    pub fn remove_menu_item(&self, tree: &mut MenuTree, plugin_id: &str) -> usize {
        let removed = tree.forbid_plugin(plugin_id);
        debug!(plugin_id, removed, "removed menu item");
        removed
    }

    /// Replace each configured root item with its accessible children.
    pub fn expand_menu_items(&self, tree: &mut MenuTree) {
        for key in &self.settings.expand {
            match tree.promote_subtree(key) {
                Some(promoted) => debug!(key = %key, promoted, "expanded menu item"),
                None => debug!(key = %key, "menu item to expand is not at the root"),
            }
        }
    }

    /// Turn configured links into plain text.
    ///
    /// Only statically defined links are rebuilt; derived links with a
    /// matching plugin id are left as they are. Returns the number of
    /// rewritten links.
    pub fn make_menu_items_not_clickable(&self, tree: &mut MenuTree) -> usize {
        let unclickable = &self.settings.unclickable;
        if unclickable.is_empty() {
            return 0;
        }

        let mut rewritten = 0;
        tree.walk(|key, node| {
            if !node.link.kind.supports_rewrite()
                || !unclickable.iter().any(|id| id == node.plugin_id())
            {
                return;
            }

            let mut definition = node.link.definition.clone();
            definition.insert(ROUTE_NAME_KEY.to_string(), Value::from(NO_LINK_ROUTE));
            definition.insert(PARENT_KEY.to_string(), Value::from(""));
            node.link = self.links.create(node.link.plugin_id(), definition);

            rewritten += 1;
            debug!(key, plugin_id = %node.plugin_id(), "made menu item not clickable");
        });
        rewritten
    }

    /// Forbid routeless nodes that have no visible children.
    ///
    /// Children are evaluated before their parent, so a routeless parent
    /// whose children were all pruned in this pass is pruned too. Returns
    /// the number of nodes that became forbidden.
    pub fn remove_empty_menu_items(&self, tree: &mut MenuTree) -> usize {
        let mut removed = 0;
        for (key, id) in tree.post_order() {
            let node = tree.node(id);
            if !node.access.is_allowed() || !node.link.has_empty_route() {
                continue;
            }

            let has_visible_children = node
                .subtree()
                .iter()
                .any(|(_, child)| tree.node(child).access.is_allowed());
            if has_visible_children {
                continue;
            }

            tree.node_mut(id).access = Access::Forbidden;
            removed += 1;
            debug!(key = %key, "removed empty menu item");
        }
        removed
    }

    /// Show either the combined toolbar items or the built-in ones.
    pub fn check_custom_menu_items_access(&self, tree: &mut MenuTree) {
        let settings = &self.settings;

        if !settings.show_combined_content_overview {
            self.remove_menu_item(tree, item_ids::CONTENT_OVERVIEW);
        }

        if settings.show_combined_content_overview && settings.lists_all_taxonomy_terms() {
            self.remove_menu_item(tree, item_ids::TAXONOMY_VOCABULARY_COLLECTION);
        }

        if settings.show_combined_add_content {
            self.remove_menu_item(tree, item_ids::ADMIN_TOOLBAR_ADD_CONTENT);
            self.remove_menu_item(tree, item_ids::ADMIN_TOOLBAR_NODE_ADD);
        } else {
            self.remove_menu_item(tree, item_ids::CONTENT_ADD);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::link::{LinkKind, MenuLink, PluginDefinition};
    use crate::menu::tree::MenuNode;

    fn node(plugin_id: &str) -> MenuNode {
        MenuNode::new(MenuLink::default_link(plugin_id).route("system.admin"))
    }

    fn routeless(plugin_id: &str) -> MenuNode {
        MenuNode::new(MenuLink::default_link(plugin_id).route(NO_LINK_ROUTE))
    }

    fn manipulators(settings: ToolbarSettings) -> ToolbarManipulators {
        ToolbarManipulators::new(settings)
    }

    #[test]
    fn remove_menu_item_reaches_nested_duplicates() {
        let mut tree = MenuTree::new();
        let a = tree.insert_root("a", node("x"));
        let b = tree.insert_child(a, "b", node("y"));
        let c = tree.insert_root("c", node("y"));

        let removed = manipulators(ToolbarSettings::default()).remove_menu_item(&mut tree, "y");

        assert_eq!(removed, 2);
        assert_eq!(tree.node(a).access, Access::Allowed);
        assert_eq!(tree.node(b).access, Access::Forbidden);
        assert_eq!(tree.node(c).access, Access::Forbidden);
    }

    #[test]
    fn remove_menu_items_applies_list() {
        let mut tree = MenuTree::new();
        let help = tree.insert_root("help.main", node("help.main"));
        let reports = tree.insert_root("system.admin_reports", node("system.admin_reports"));
        let content = tree.insert_root("system.admin_content", node("system.admin_content"));

        let settings = ToolbarSettings {
            remove: vec!["help.main".into(), "system.admin_reports".into(), "nope".into()],
            ..Default::default()
        };
        manipulators(settings).remove_menu_items(&mut tree);

        assert_eq!(tree.node(help).access, Access::Forbidden);
        assert_eq!(tree.node(reports).access, Access::Forbidden);
        assert_eq!(tree.node(content).access, Access::Allowed);
    }

    #[test]
    fn not_clickable_rewrites_default_links_only() {
        let mut tree = MenuTree::new();
        let add = tree.insert_root(
            "node.add_page",
            MenuNode::new(
                MenuLink::default_link("node.add_page")
                    .route("node.add_page")
                    .set("parent", "system.admin_content")
                    .set("title", "Add content"),
            ),
        );
        let views = tree.insert_root(
            "views",
            MenuNode::new(MenuLink::new(LinkKind::Views, "node.add_page").route("view.page")),
        );
        let other = tree.insert_root("other", node("other"));

        let settings = ToolbarSettings {
            unclickable: vec!["node.add_page".into()],
            ..Default::default()
        };
        let rewritten = manipulators(settings).make_menu_items_not_clickable(&mut tree);

        assert_eq!(rewritten, 1);
        let link = &tree.node(add).link;
        assert_eq!(link.plugin_id(), "node.add_page");
        assert_eq!(link.route_name(), NO_LINK_ROUTE);
        assert_eq!(link.parent(), "");
        assert_eq!(link.definition["title"], "Add content");
        assert_eq!(tree.node(views).link.route_name(), "view.page");
        assert_eq!(tree.node(other).link.route_name(), "system.admin");
    }

    struct TaggingFactory;

    impl LinkFactory for TaggingFactory {
        fn create(&self, plugin_id: &str, mut definition: PluginDefinition) -> MenuLink {
            definition.insert("rebuilt".into(), true.into());
            DefaultLinkFactory.create(plugin_id, definition)
        }
    }

    #[test]
    fn not_clickable_uses_link_factory() {
        let mut tree = MenuTree::new();
        let id = tree.insert_root("a", node("a"));
        let settings = ToolbarSettings {
            unclickable: vec!["a".into()],
            ..Default::default()
        };
        manipulators(settings)
            .with_link_factory(TaggingFactory)
            .make_menu_items_not_clickable(&mut tree);
        assert_eq!(tree.node(id).link.definition["rebuilt"], true);
    }

    #[test]
    fn remove_empty_prunes_bottom_up() {
        let mut tree = MenuTree::new();
        let outer = tree.insert_root("outer", routeless("outer"));
        let inner = tree.insert_child(outer, "inner", routeless("inner"));
        let leaf = tree.insert_child(inner, "leaf", node("leaf").forbidden());

        let removed = manipulators(ToolbarSettings::default()).remove_empty_menu_items(&mut tree);

        assert_eq!(removed, 2);
        assert_eq!(tree.node(inner).access, Access::Forbidden);
        assert_eq!(tree.node(outer).access, Access::Forbidden);
        assert_eq!(tree.node(leaf).access, Access::Forbidden);
    }

    #[test]
    fn remove_empty_keeps_parents_with_visible_children() {
        let mut tree = MenuTree::new();
        let parent = tree.insert_root("parent", routeless("parent"));
        tree.insert_child(parent, "child", node("child"));
        let none = tree.insert_root(
            "none",
            MenuNode::new(MenuLink::default_link("none").route("<none>")),
        );

        let removed = manipulators(ToolbarSettings::default()).remove_empty_menu_items(&mut tree);

        assert_eq!(removed, 1);
        assert_eq!(tree.node(parent).access, Access::Allowed);
        assert_eq!(tree.node(none).access, Access::Forbidden);
    }

    #[test]
    fn remove_empty_targets_the_node_not_its_plugin_id() {
        let mut tree = MenuTree::new();
        let empty = tree.insert_root("empty", routeless("shared"));
        let full = tree.insert_root("full", routeless("shared"));
        tree.insert_child(full, "child", node("child"));

        manipulators(ToolbarSettings::default()).remove_empty_menu_items(&mut tree);

        assert_eq!(tree.node(empty).access, Access::Forbidden);
        assert_eq!(tree.node(full).access, Access::Allowed);
    }

    fn custom_items_tree() -> MenuTree {
        let mut tree = MenuTree::new();
        for id in [
            item_ids::CONTENT_OVERVIEW,
            item_ids::CONTENT_ADD,
            item_ids::TAXONOMY_VOCABULARY_COLLECTION,
            item_ids::ADMIN_TOOLBAR_ADD_CONTENT,
            item_ids::ADMIN_TOOLBAR_NODE_ADD,
        ] {
            tree.insert_root(id, node(id));
        }
        tree
    }

    fn forbidden_ids(tree: &MenuTree) -> Vec<&str> {
        tree.root()
            .iter()
            .filter(|(_, id)| !tree.node(*id).access.is_allowed())
            .map(|(key, _)| key)
            .collect()
    }

    #[test]
    fn custom_items_all_off() {
        let mut tree = custom_items_tree();
        manipulators(ToolbarSettings::default()).check_custom_menu_items_access(&mut tree);
        assert_eq!(
            forbidden_ids(&tree),
            vec![item_ids::CONTENT_OVERVIEW, item_ids::CONTENT_ADD]
        );
    }

    #[test]
    fn custom_items_all_on() {
        let mut tree = custom_items_tree();
        let settings = ToolbarSettings {
            show_combined_add_content: true,
            show_combined_content_overview: true,
            taxonomy_term_display: Some("all".into()),
            ..Default::default()
        };
        manipulators(settings).check_custom_menu_items_access(&mut tree);
        assert_eq!(
            forbidden_ids(&tree),
            vec![
                item_ids::TAXONOMY_VOCABULARY_COLLECTION,
                item_ids::ADMIN_TOOLBAR_ADD_CONTENT,
                item_ids::ADMIN_TOOLBAR_NODE_ADD,
            ]
        );
    }

    #[test]
    fn custom_items_overview_without_all_terms() {
        let mut tree = custom_items_tree();
        let settings = ToolbarSettings {
            show_combined_content_overview: true,
            taxonomy_term_display: Some("none".into()),
            ..Default::default()
        };
        manipulators(settings).check_custom_menu_items_access(&mut tree);
        assert_eq!(forbidden_ids(&tree), vec![item_ids::CONTENT_ADD]);
    }

    #[test]
    fn taxonomy_mode_ignored_without_overview() {
        let mut tree = custom_items_tree();
        let settings = ToolbarSettings {
            taxonomy_term_display: Some("all".into()),
            ..Default::default()
        };
        manipulators(settings).check_custom_menu_items_access(&mut tree);
        assert!(
            !forbidden_ids(&tree).contains(&item_ids::TAXONOMY_VOCABULARY_COLLECTION)
        );
    }
}
