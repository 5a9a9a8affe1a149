//! The rendering substrate the engine draws into.
//!
//! The engine never touches a DOM (or any other widget tree) directly. It
//! creates, places and removes nodes through this trait, and learns about
//! clicks through [`InputEvent::Click`](crate::InputEvent::Click) notifications
//! that the host feeds back in. `hangman-web` implements it over `web-sys`;
//! [`MemorySurface`] is the headless implementation.

pub mod memory;

pub use memory::MemorySurface;

use crate::api::error::EngineError;
use crate::api::types::NodeId;
use crate::core::position::Position;

/// Which kind of node to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A clickable button (keyboard letters and their clones).
    Button,
    /// A plain block (blank slots).
    Block,
}

/// Everything needed to create a detached node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub kind: NodeKind,
    /// Identity string, unique among live nodes.
    pub identity: String,
    /// Class tag used for styling.
    pub class: &'static str,
    /// Text label (empty for blank slots).
    pub label: String,
}

impl NodeSpec {
    pub fn button(identity: impl Into<String>, class: &'static str, label: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Button,
            identity: identity.into(),
            class,
            label: label.into(),
        }
    }

    pub fn block(identity: impl Into<String>, class: &'static str) -> Self {
        Self {
            kind: NodeKind::Block,
            identity: identity.into(),
            class,
            label: String::new(),
        }
    }
}

/// Contract for the host's visual tree.
///
/// Node handles stay valid until the node is removed, either directly or by
/// clearing its parent. Operations on a removed handle are no-ops.
pub trait Surface {
    /// Resolve a caller-supplied locator to an existing node.
    fn locate(&mut self, locator: &str) -> Option<NodeId>;

    /// Create a detached node.
    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, EngineError>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Insert `child` into `sibling`'s parent, immediately before `sibling`.
    fn insert_before(&mut self, child: NodeId, sibling: NodeId);

    /// Detach a node (and its subtree) from the tree and invalidate its handle.
    fn remove_node(&mut self, node: NodeId);

    /// Remove every child of `parent`.
    fn clear_children(&mut self, parent: NodeId);

    /// Current screen-space position of the node's top-left corner.
    fn bounds(&self, node: NodeId) -> Position;

    /// Take the node out of layout flow and pin it at `pos`.
    fn place(&mut self, node: NodeId, pos: Position);

    /// Show or hide the node without removing it.
    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Add (`on = true`) or remove a class tag.
    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool);

    /// Point an image node at a new source.
    fn set_image(&mut self, node: NodeId, src: &str);

    /// Start delivering click notifications for `node`.
    fn listen_click(&mut self, node: NodeId);
}
