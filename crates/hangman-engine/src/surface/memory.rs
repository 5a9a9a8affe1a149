use std::collections::HashMap;

use crate::api::error::EngineError;
use crate::api::types::NodeId;
use crate::core::position::Position;
use super::{NodeKind, NodeSpec, Surface};

/// Horizontal pitch between siblings laid out in flow.
const FLOW_PITCH: f32 = 40.0;

/// One node of a [`MemorySurface`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub identity: String,
    pub classes: Vec<String>,
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Pinned position, or the mount origin for root containers.
    pub origin: Position,
    /// Whether the node was taken out of flow by `place`.
    pub pinned: bool,
    pub visible: bool,
    pub image: Option<String>,
    pub clickable: bool,
}

impl MemoryNode {
    fn new(id: NodeId, kind: NodeKind, identity: String) -> Self {
        Self {
            id,
            kind,
            identity,
            classes: Vec::new(),
            label: String::new(),
            parent: None,
            children: Vec::new(),
            origin: Position::ORIGIN,
            pinned: false,
            visible: true,
            image: None,
            clickable: false,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Headless surface backed by a flat node table.
///
/// Nodes in flow are laid out left to right from their parent's position,
/// one `FLOW_PITCH` apart, so positions are deterministic without a browser.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: Vec<MemoryNode>,
    locators: HashMap<String, NodeId>,
    next_id: u32,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root container at `origin`, reachable through `locator`.
    pub fn mount(&mut self, locator: impl Into<String>, origin: Position) -> NodeId {
        let locator = locator.into();
        let id = self.alloc();
        let mut node = MemoryNode::new(id, NodeKind::Block, locator.clone());
        node.origin = origin;
        self.nodes.push(node);
        self.locators.insert(locator, id);
        id
    }

    /// Get a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a live node by identity string.
    pub fn find_by_identity(&self, identity: &str) -> Option<&MemoryNode> {
        self.nodes.iter().find(|n| n.identity == identity)
    }

    /// Live children of `parent`, in order.
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        self.node(parent).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Current image source of an image node.
    pub fn image(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.image.as_deref())
    }

    /// Number of live nodes, mounted containers included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.node(child).and_then(|n| n.parent);
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|&c| c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    fn drop_subtree(&mut self, root: NodeId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if let Some(idx) = self.nodes.iter().position(|n| n.id == id) {
                let node = self.nodes.swap_remove(idx);
                pending.extend(node.children);
            }
        }
        self.locators.retain(|_, id| *id != root);
    }
}

impl Surface for MemorySurface {
    fn locate(&mut self, locator: &str) -> Option<NodeId> {
        self.locators.get(locator).copied()
    }

    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, EngineError> {
        if spec.identity.is_empty() {
            return Err(EngineError::Surface("node identity must not be empty".into()));
        }
        let id = self.alloc();
        let mut node = MemoryNode::new(id, spec.kind, spec.identity);
        node.classes.push(spec.class.to_string());
        node.label = spec.label;
        self.nodes.push(node);
        Ok(id)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        let Some(parent) = self.node(sibling).and_then(|n| n.parent) else {
            return;
        };
        if self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            let at = p.children.iter().position(|&c| c == sibling).unwrap_or(p.children.len());
            p.children.insert(at, child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        self.detach(node);
        self.drop_subtree(node);
    }

    fn clear_children(&mut self, parent: NodeId) {
        let children = match self.node_mut(parent) {
            Some(p) => std::mem::take(&mut p.children),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
    }

    fn bounds(&self, node: NodeId) -> Position {
        let Some(n) = self.node(node) else {
            return Position::ORIGIN;
        };
        if n.pinned {
            return n.origin;
        }
        match n.parent {
            None => n.origin,
            Some(parent) => {
                // Pinned siblings are out of flow and take no space.
                let slot = self
                    .children(parent)
                    .iter()
                    .take_while(|&&c| c != node)
                    .filter(|&&c| self.node(c).is_some_and(|s| !s.pinned))
                    .count();
                self.bounds(parent).offset(slot as f32 * FLOW_PITCH, 0.0)
            }
        }
    }

    fn place(&mut self, node: NodeId, pos: Position) {
        if let Some(n) = self.node_mut(node) {
            n.origin = pos;
            n.pinned = true;
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(n) = self.node_mut(node) {
            n.visible = visible;
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(n) = self.node_mut(node) {
            let present = n.has_class(class);
            if on && !present {
                n.classes.push(class.to_string());
            } else if !on && present {
                n.classes.retain(|c| c != class);
            }
        }
    }

    fn set_image(&mut self, node: NodeId, src: &str) {
        if let Some(n) = self.node_mut(node) {
            n.image = Some(src.to_string());
        }
    }

    fn listen_click(&mut self, node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.clickable = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_and_locate() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#root", Position::new(10.0, 20.0));
        assert_eq!(surface.locate("#root"), Some(root));
        assert_eq!(surface.locate("#missing"), None);
        assert_eq!(surface.bounds(root), Position::new(10.0, 20.0));
    }

    #[test]
    fn flow_layout_and_insert_before() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#root", Position::new(0.0, 100.0));
        let a = surface.create_node(NodeSpec::block("a", "space-item")).unwrap();
        let b = surface.create_node(NodeSpec::block("b", "space-item")).unwrap();
        surface.append_child(root, a);
        surface.append_child(root, b);
        assert_eq!(surface.bounds(b), Position::new(FLOW_PITCH, 100.0));

        let c = surface.create_node(NodeSpec::button("c", "letter-box", "C")).unwrap();
        surface.insert_before(c, b);
        assert_eq!(surface.children(root), &[a, c, b]);
        assert_eq!(surface.bounds(b), Position::new(2.0 * FLOW_PITCH, 100.0));
    }

    #[test]
    fn pinned_nodes_leave_flow() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#root", Position::ORIGIN);
        let a = surface.create_node(NodeSpec::block("a", "x")).unwrap();
        let b = surface.create_node(NodeSpec::block("b", "x")).unwrap();
        surface.append_child(root, a);
        surface.append_child(root, b);
        surface.place(a, Position::new(500.0, 500.0));
        assert_eq!(surface.bounds(a), Position::new(500.0, 500.0));
        assert_eq!(surface.bounds(b), Position::ORIGIN);
    }

    #[test]
    fn clear_children_drops_subtree() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#root", Position::ORIGIN);
        for i in 0..3 {
            let n = surface.create_node(NodeSpec::block(format!("n{}", i), "x")).unwrap();
            surface.append_child(root, n);
        }
        assert_eq!(surface.len(), 4);
        surface.clear_children(root);
        assert_eq!(surface.len(), 1);
        assert!(surface.children(root).is_empty());
        assert!(surface.find_by_identity("n0").is_none());
    }

    #[test]
    fn toggle_class_is_idempotent() {
        let mut surface = MemorySurface::new();
        let n = surface.create_node(NodeSpec::button("b", "letter-box", "B")).unwrap();
        surface.toggle_class(n, "disabled", true);
        surface.toggle_class(n, "disabled", true);
        assert_eq!(surface.node(n).unwrap().classes, vec!["letter-box", "disabled"]);
        surface.toggle_class(n, "disabled", false);
        assert!(!surface.node(n).unwrap().has_class("disabled"));
    }

    #[test]
    fn empty_identity_is_rejected() {
        let mut surface = MemorySurface::new();
        assert!(surface.create_node(NodeSpec::block("", "x")).is_err());
    }
}
