use std::cell::RefCell;
use std::rc::Rc;

use hangman_engine::{EngineError, InputEvent, InputQueue, NodeId, NodeKind, NodeSpec, Position, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement};

/// Handle-indexed storage whose freed entries are reused by later inserts.
struct NodeTable<T> {
    entries: Vec<Option<T>>,
    free: Vec<u32>,
}

impl<T> NodeTable<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, value: T) -> NodeId {
        match self.free.pop() {
            Some(i) => {
                self.entries[i as usize] = Some(value);
                NodeId(i)
            }
            None => {
                self.entries.push(Some(value));
                NodeId(self.entries.len() as u32 - 1)
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&T> {
        self.entries.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.entries.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn take(&mut self, id: NodeId) -> Option<T> {
        let value = self.entries.get_mut(id.0 as usize).and_then(Option::take)?;
        self.free.push(id.0);
        Some(value)
    }

    fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|v| (NodeId(i as u32), v)))
    }

    /// Number of allocated entries, live or free.
    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.entries.len()
    }
}

struct DomNode {
    element: HtmlElement,
    parent: Option<NodeId>,
    on_click: Option<Closure<dyn FnMut()>>,
}

/// [`Surface`] over the live document.
///
/// Node handles index a table of elements. Click listeners push
/// [`InputEvent::Click`] into the shared queue; the runner drains it on the
/// next frame, so no engine code runs inside a DOM callback.
pub struct DomSurface {
    document: Document,
    nodes: NodeTable<DomNode>,
    input: Rc<RefCell<InputQueue>>,
}

impl DomSurface {
    pub fn new(document: Document, input: Rc<RefCell<InputQueue>>) -> Self {
        Self {
            document,
            nodes: NodeTable::new(),
            input,
        }
    }

    fn register(&mut self, element: HtmlElement) -> NodeId {
        self.nodes.insert(DomNode {
            element,
            parent: None,
            on_click: None,
        })
    }

    fn get(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(id)
    }

    fn element(&self, id: NodeId) -> Option<&HtmlElement> {
        self.get(id).map(|n| &n.element)
    }

    fn set_style(&self, id: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element(id) {
            if let Err(e) = el.style().set_property(property, value) {
                log::warn!("style {}={} failed: {:?}", property, value, e);
            }
        }
    }

    /// Forget a node and every tracked descendant, releasing their listeners.
    /// Their handles become free for reuse.
    fn forget(&mut self, root: NodeId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.take(id) else {
                continue;
            };
            if let Some(cb) = node.on_click {
                let _ = node
                    .element
                    .remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
            }
            pending.extend(self.children_of(id));
        }
    }

    fn children_of(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(parent))
            .map(|(id, _)| id)
            .collect()
    }
}

impl Surface for DomSurface {
    fn locate(&mut self, locator: &str) -> Option<NodeId> {
        let element = self
            .document
            .query_selector(locator)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let known = self
            .nodes
            .iter()
            .find(|(_, n)| n.element == element)
            .map(|(id, _)| id);
        Some(match known {
            Some(id) => id,
            None => self.register(element),
        })
    }

    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, EngineError> {
        let tag = match spec.kind {
            NodeKind::Button => "button",
            NodeKind::Block => "div",
        };
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| EngineError::Surface(format!("create <{}>: {:?}", tag, e)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| EngineError::Surface(format!("<{}> is not an HTML element", tag)))?;
        element.set_id(&spec.identity);
        element.set_class_name(spec.class);
        if !spec.label.is_empty() {
            element.set_text_content(Some(&spec.label));
        }
        Ok(self.register(element))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let (Some(p), Some(c)) = (self.element(parent), self.element(child)) else {
            return;
        };
        if let Err(e) = p.append_child(c) {
            log::warn!("append {:?} to {:?} failed: {:?}", child, parent, e);
            return;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        let Some(parent) = self.get(sibling).and_then(|n| n.parent) else {
            return;
        };
        let (Some(p), Some(c), Some(s)) = (
            self.element(parent),
            self.element(child),
            self.element(sibling),
        ) else {
            return;
        };
        if let Err(e) = p.insert_before(c, Some(s)) {
            log::warn!("insert {:?} before {:?} failed: {:?}", child, sibling, e);
            return;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        if let Some(el) = self.element(node) {
            el.remove();
        }
        self.forget(node);
    }

    fn clear_children(&mut self, parent: NodeId) {
        for child in self.children_of(parent) {
            self.forget(child);
        }
        if let Some(el) = self.element(parent) {
            el.set_inner_html("");
        }
    }

    fn bounds(&self, node: NodeId) -> Position {
        match self.element(node) {
            Some(el) => {
                let rect = el.get_bounding_client_rect();
                Position::new(rect.x() as f32, rect.y() as f32)
            }
            None => Position::ORIGIN,
        }
    }

    fn place(&mut self, node: NodeId, pos: Position) {
        // Bounds are viewport coordinates, so pinned nodes are fixed to the viewport.
        self.set_style(node, "position", "fixed");
        self.set_style(node, "left", &format!("{}px", pos.x()));
        self.set_style(node, "top", &format!("{}px", pos.y()));
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.set_style(node, "display", if visible { "" } else { "none" });
    }

    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_image(&mut self, node: NodeId, src: &str) {
        let Some(el) = self.element(node) else {
            return;
        };
        match el.dyn_ref::<HtmlImageElement>() {
            Some(img) => img.set_src(src),
            None => {
                let _ = el.set_attribute("src", src);
            }
        }
    }

    fn listen_click(&mut self, node: NodeId) {
        let input = Rc::clone(&self.input);
        let Some(entry) = self.get_mut(node) else {
            return;
        };
        if entry.on_click.is_some() {
            return;
        }
        let cb = Closure::wrap(Box::new(move || {
            input.borrow_mut().push(InputEvent::Click { node });
        }) as Box<dyn FnMut()>);
        if let Err(e) = entry
            .element
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        {
            log::warn!("listen on {:?} failed: {:?}", node, e);
            return;
        }
        entry.on_click = Some(cb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_handles_are_reused() {
        let mut table = NodeTable::new();
        let a = table.insert('a');
        let b = table.insert('b');
        assert_eq!(table.take(a), Some('a'));
        assert_eq!(table.get(a), None);

        let c = table.insert('c');
        assert_eq!(c, a);
        assert_eq!(table.get(c), Some(&'c'));
        assert_eq!(table.get(b), Some(&'b'));
        assert_eq!(table.capacity(), 2);
    }

    #[test]
    fn table_stays_bounded_across_rounds() {
        let mut table = NodeTable::new();
        for _ in 0..50 {
            let ids: Vec<_> = (0..30).map(|i| table.insert(i)).collect();
            for id in ids {
                table.take(id);
            }
        }
        assert_eq!(table.capacity(), 30);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn double_take_frees_once() {
        let mut table = NodeTable::new();
        let a = table.insert(1);
        assert_eq!(table.take(a), Some(1));
        assert_eq!(table.take(a), None);
        let b = table.insert(2);
        let c = table.insert(3);
        assert_ne!(b, c);
    }
}
