//! Menu link descriptors and per-node access decisions.
//!
//! A link is a plugin id plus its plugin definition (route name, parent,
//! title, ...). The variant records where the link came from, which decides
//! whether the toolbar is allowed to rebuild it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Route name of a link that renders as plain text.
pub const NO_LINK_ROUTE: &str = "<nolink>";

/// Route name of a link without any target.
pub const NONE_ROUTE: &str = "<none>";

/// Route names meaning "this entry has no navigable target".
pub const EMPTY_ROUTES: &[&str] = &[NO_LINK_ROUTE, NONE_ROUTE];

/// Definition key holding the route name.
pub const ROUTE_NAME_KEY: &str = "route_name";

/// Definition key holding the parent plugin id.
pub const PARENT_KEY: &str = "parent";

/// Plugin definition of a link (string keys, arbitrary values).
pub type PluginDefinition = Map<String, Value>;

/// Where a menu link comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Statically defined link.
    #[default]
    Default,
    /// Link derived from a views display.
    Views,
    /// Placeholder for a link the current user may not see.
    Inaccessible,
}

impl LinkKind {
    /// Whether a link of this kind may be rebuilt from its definition.
    ///
    /// Only statically defined links can; derived links are left alone.
    pub fn supports_rewrite(self) -> bool {
        matches!(self, Self::Default)
    }
}

/// A menu link record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuLink {
    /// Link variant.
    #[serde(rename = "type", default)]
    pub kind: LinkKind,

    /// Stable plugin id, e.g. `system.admin_content`.
    pub plugin_id: String,

    /// Plugin definition.
    #[serde(default)]
    pub definition: PluginDefinition,
}

impl MenuLink {
    pub fn new(kind: LinkKind, plugin_id: impl Into<String>) -> Self {
        Self {
            kind,
            plugin_id: plugin_id.into(),
            definition: PluginDefinition::new(),
        }
    }

    /// Shorthand for a statically defined link.
    pub fn default_link(plugin_id: impl Into<String>) -> Self {
        Self::new(LinkKind::Default, plugin_id)
    }

    /// Set the route name.
    pub fn route(self, route_name: impl Into<String>) -> Self {
        let route_name: String = route_name.into();
        self.set(ROUTE_NAME_KEY, route_name)
    }

    /// Set an arbitrary definition value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.definition.insert(key.into(), value.into());
        self
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Route name from the definition, empty when unset.
    pub fn route_name(&self) -> &str {
        self.definition_str(ROUTE_NAME_KEY)
    }

    /// Parent plugin id from the definition, empty when unset.
    pub fn parent(&self) -> &str {
        self.definition_str(PARENT_KEY)
    }

    pub fn is_inaccessible(&self) -> bool {
        self.kind == LinkKind::Inaccessible
    }

    /// True when the route name is one of the [`EMPTY_ROUTES`] sentinels.
    pub fn has_empty_route(&self) -> bool {
        EMPTY_ROUTES.contains(&self.route_name())
    }

    fn definition_str(&self, key: &str) -> &str {
        self.definition
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Builds replacement links when the toolbar rewrites a definition.
pub trait LinkFactory: Send + Sync {
    fn create(&self, plugin_id: &str, definition: PluginDefinition) -> MenuLink;
}

/// Factory producing statically defined links.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLinkFactory;

impl LinkFactory for DefaultLinkFactory {
    fn create(&self, plugin_id: &str, definition: PluginDefinition) -> MenuLink {
        MenuLink {
            kind: LinkKind::Default,
            plugin_id: plugin_id.to_string(),
            definition,
        }
    }
}

/// Access decision for a menu node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Allowed,
    Forbidden,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}
