use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::Document;
use crate::element::{Element, Tag};
use crate::error::{Result, ViewError};
use crate::html;

/// Handle to a node in a [`VirtualDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const BODY: NodeId = NodeId(0);

struct VirtualNode {
    element: Option<Element>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Default)]
struct Arena {
    nodes: Vec<VirtualNode>,
}

impl Arena {
    fn node(&self, id: NodeId) -> Result<&VirtualNode> {
        self.nodes.get(id.0).ok_or(ViewError::UnknownNode)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut VirtualNode> {
        self.nodes.get_mut(id.0).ok_or(ViewError::UnknownNode)
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> Result<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.node(id)?.parent;
        }
        Ok(false)
    }
}

/// Arena-backed in-memory document.
///
/// Clones share one tree, so a test can keep a handle to inspect what a
/// messenger mounted. Nodes are never freed; detached subtrees stay
/// addressable for inspection.
#[derive(Clone)]
pub struct VirtualDocument {
    arena: Rc<RefCell<Arena>>,
    removals: Rc<Cell<usize>>,
}

impl VirtualDocument {
    pub fn new() -> Self {
        let arena = Arena {
            nodes: vec![VirtualNode {
                element: None,
                parent: None,
                children: Vec::new(),
            }],
        };
        Self {
            arena: Rc::new(RefCell::new(arena)),
            removals: Rc::new(Cell::new(0)),
        }
    }

    pub fn body_id(&self) -> NodeId {
        BODY
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.arena
            .borrow()
            .node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.arena
            .borrow()
            .node(id)
            .ok()
            .and_then(|node| node.element.clone())
    }

    /// True when `id` is reachable from the body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let arena = self.arena.borrow();
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == BODY {
                return true;
            }
            current = arena.node(node_id).ok().and_then(|node| node.parent);
        }
        false
    }

    /// Attached nodes with the given tag, in document order.
    pub fn find_by_tag(&self, tag: Tag) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect(BODY, tag, &mut found);
        found
    }

    fn collect(&self, id: NodeId, tag: Tag, found: &mut Vec<NodeId>) {
        for child in self.children(id) {
            if self.element(child).map(|el| el.tag()) == Some(tag) {
                found.push(child);
            }
            self.collect(child, tag, found);
        }
    }

    /// Activate a node. Returns false when it has no click handler.
    ///
    /// The handler runs with no internal borrow held, so it may mutate the
    /// document (for example, remove the node it was attached to).
    pub fn click(&self, id: NodeId) -> bool {
        let handler = self.element(id).and_then(|el| el.click_handler());
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Number of successful `remove_child` calls so far.
    pub fn removal_count(&self) -> usize {
        self.removals.get()
    }

    /// HTML of everything attached to the body.
    pub fn html(&self) -> String {
        self.children(BODY)
            .into_iter()
            .map(|child| self.render(child))
            .collect()
    }

    fn render(&self, id: NodeId) -> String {
        let inner: String = self
            .children(id)
            .into_iter()
            .map(|child| self.render(child))
            .collect();
        match self.element(id) {
            Some(element) => html::render_with_children(&element, &inner),
            None => inner,
        }
    }
}

impl Default for VirtualDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for VirtualDocument {
    type Node = NodeId;

    fn body(&self) -> Result<NodeId> {
        Ok(BODY)
    }

    fn create(&self, element: &Element) -> Result<NodeId> {
        let mut arena = self.arena.borrow_mut();
        let id = NodeId(arena.nodes.len());
        arena.nodes.push(VirtualNode {
            element: Some(element.clone()),
            parent: None,
            children: Vec::new(),
        });
        Ok(id)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let mut arena = self.arena.borrow_mut();
        arena.node(*child)?;
        if arena.is_ancestor_or_self(*child, *parent)? {
            return Err(ViewError::Cycle);
        }
        if let Some(previous) = arena.node(*child)?.parent {
            arena.node_mut(previous)?.children.retain(|id| id != child);
        }
        arena.node_mut(*child)?.parent = Some(*parent);
        arena.node_mut(*parent)?.children.push(*child);
        Ok(())
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.arena.borrow().node(*node).ok().and_then(|n| n.parent)
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let mut arena = self.arena.borrow_mut();
        if arena.node(*child)?.parent != Some(*parent) {
            return Err(ViewError::NotAChild);
        }
        arena.node_mut(*parent)?.children.retain(|id| id != child);
        arena.node_mut(*child)?.parent = None;
        drop(arena);
        self.removals.set(self.removals.get().saturating_add(1));
        tracing::trace!(node = child.0, "virtual node detached");
        Ok(())
    }
}

impl std::fmt::Debug for VirtualDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualDocument")
            .field("nodes", &self.arena.borrow().nodes.len())
            .field("removals", &self.removals.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::factory::Overlay;
    use crate::sizing::Sizing;

    fn mount(doc: &VirtualDocument, overlay: &Overlay) -> (NodeId, NodeId) {
        let container = doc.create(&overlay.container).unwrap();
        let wrapper = doc.create(&overlay.wrapper).unwrap();
        let frame = doc.create(&overlay.frame).unwrap();
        let button = doc.create(&overlay.close_button).unwrap();
        doc.append_child(&wrapper, &frame).unwrap();
        doc.append_child(&wrapper, &button).unwrap();
        doc.append_child(&container, &wrapper).unwrap();
        doc.append_child(&doc.body().unwrap(), &container).unwrap();
        (frame, button)
    }

    #[test]
    fn mounted_tree_matches_overlay_html() {
        let doc = VirtualDocument::new();
        let overlay = Overlay::build("https://a.test/", &Sizing::default(), Rc::new(|| {}));
        let (frame, _) = mount(&doc, &overlay);

        assert!(doc.is_attached(frame));
        assert_eq!(doc.html(), overlay.to_html());
        assert_eq!(doc.find_by_tag(Tag::Iframe), vec![frame]);
    }

    #[test]
    fn detaching_container_detaches_subtree() {
        let doc = VirtualDocument::new();
        let overlay = Overlay::build("https://a.test/", &Sizing::default(), Rc::new(|| {}));
        let (frame, _) = mount(&doc, &overlay);

        let wrapper = doc.parent(&frame).unwrap();
        let container = doc.parent(&wrapper).unwrap();
        doc.remove_child(&doc.body_id(), &container).unwrap();

        assert!(!doc.is_attached(frame));
        assert!(doc.html().is_empty());
        assert_eq!(doc.removal_count(), 1);
        assert_eq!(
            doc.remove_child(&doc.body_id(), &container),
            Err(ViewError::NotAChild)
        );
        assert_eq!(doc.removal_count(), 1);
    }

    #[test]
    fn click_runs_handler_that_mutates_document() {
        let doc = VirtualDocument::new();
        let clicks = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&clicks);
        let handler_doc = doc.clone();
        let overlay = Overlay::build(
            "https://a.test/",
            &Sizing::default(),
            Rc::new(move || {
                counter.set(counter.get() + 1);
                for child in handler_doc.children(handler_doc.body_id()) {
                    let _ = handler_doc.remove_child(&handler_doc.body_id(), &child);
                }
            }),
        );
        let (frame, button) = mount(&doc, &overlay);

        assert!(doc.click(button));
        assert_eq!(clicks.get(), 1);
        assert!(!doc.is_attached(frame));
        assert!(!doc.click(frame));
    }

    #[test]
    fn unknown_node_is_an_error() {
        let doc = VirtualDocument::new();
        let other = VirtualDocument::new();
        let stray = other.create(&Element::new(Tag::Div)).unwrap();
        assert_eq!(
            doc.append_child(&doc.body_id(), &stray),
            Err(ViewError::UnknownNode)
        );
    }

    #[test]
    fn appending_an_ancestor_is_refused() {
        let doc = VirtualDocument::new();
        let outer = doc.create(&Element::new(Tag::Div)).unwrap();
        let inner = doc.create(&Element::new(Tag::Div)).unwrap();
        let leaf = doc.create(&Element::new(Tag::Button)).unwrap();
        doc.append_child(&outer, &inner).unwrap();
        doc.append_child(&inner, &leaf).unwrap();
        doc.append_child(&doc.body_id(), &outer).unwrap();
        let before = doc.html();

        assert_eq!(doc.append_child(&outer, &outer), Err(ViewError::Cycle));
        assert_eq!(doc.append_child(&leaf, &outer), Err(ViewError::Cycle));
        assert_eq!(doc.append_child(&inner, &doc.body_id()), Err(ViewError::Cycle));
        assert_eq!(doc.parent(&outer), Some(doc.body_id()));
        assert_eq!(doc.html(), before);

        doc.append_child(&outer, &leaf).unwrap();
        assert_eq!(doc.parent(&leaf), Some(outer));
    }
}
