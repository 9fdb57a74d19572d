//! Menu tree model and editor toolbar manipulators.
//!
//! The host builds a [`MenuTree`] per request and the toolbar rewrites it:
//! - forbidding configured or custom items
//! - expanding root items into their children
//! - turning links into plain text
//! - pruning routeless items without visible children

mod link;
mod manipulators;
mod tree;

pub use link::{
    Access, DefaultLinkFactory, EMPTY_ROUTES, LinkFactory, LinkKind, MenuLink, NO_LINK_ROUTE,
    NONE_ROUTE, PARENT_KEY, PluginDefinition, ROUTE_NAME_KEY,
};
pub use manipulators::{ToolbarManipulators, item_ids};
pub use tree::{Level, MenuNode, MenuTree, NodeId};
