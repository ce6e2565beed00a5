// In-memory document used by native hosts and tests.

use std::collections::BTreeMap;

use super::{NodeId, Rect, Surface, Viewport};

#[derive(Debug, Default)]
struct MemNode {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    offset_top: f64,
    offset_height: f64,
    attached: bool,
}

/// A tree of nodes kept entirely in memory.
///
/// Node `0` is the `<body>`. Removed nodes keep their slot (handles are never
/// reused) but report `is_attached() == false` and drop out of every query.
#[derive(Debug)]
pub struct MemorySurface {
    nodes: Vec<MemNode>,
    viewport: Viewport,
    scrolls: Vec<f64>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl MemorySurface {
    pub fn new(width: f64, height: f64) -> Self {
        let body = MemNode { tag: "body".into(), attached: true, ..MemNode::default() };
        Self {
            nodes: vec![body],
            viewport: Viewport { width, height, scroll_y: 0.0 },
            scrolls: Vec::new(),
        }
    }

    fn node(&self, id: NodeId) -> Option<&MemNode> {
        self.nodes.get(id.0 as usize).filter(|n| n.attached)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemNode> {
        self.nodes.get_mut(id.0 as usize).filter(|n| n.attached)
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element under `parent` (body when `None`).
    pub fn add_element(&mut self, parent: Option<NodeId>, tag: &str, id: Option<&str>, classes: &[&str]) -> NodeId {
        let parent = parent.unwrap_or_else(|| self.root());
        let handle = NodeId(self.nodes.len() as u32);
        self.nodes.push(MemNode {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent),
            attached: true,
            ..MemNode::default()
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.node_mut(node) {
            n.rect = rect;
        }
    }

    pub fn set_offsets(&mut self, node: NodeId, top: f64, height: f64) {
        if let Some(n) = self.node_mut(node) {
            n.offset_top = top;
            n.offset_height = height;
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    /// Scroll targets requested through [`Surface::scroll_to`], oldest first.
    pub fn scroll_requests(&self) -> &[f64] {
        &self.scrolls
    }

    /// Attached nodes in document (pre-)order, body excluded.
    fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(n) = self.node(id) {
                out.push(id);
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    fn detach(&mut self, node: NodeId) {
        let children = match self.nodes.get_mut(node.0 as usize) {
            Some(n) if n.attached => {
                n.attached = false;
                std::mem::take(&mut n.children)
            }
            _ => return,
        };
        for child in children {
            self.detach(child);
        }
    }
}

impl Surface for MemorySurface {
    fn body(&self) -> Option<NodeId> {
        Some(self.root())
    }

    fn element_by_id(&mut self, id: &str) -> Option<NodeId> {
        self.walk().into_iter().find(|&n| self.node(n).and_then(|m| m.id.as_deref()) == Some(id))
    }

    fn elements_by_class(&mut self, class: &str) -> Vec<NodeId> {
        self.walk().into_iter().filter(|&n| self.has_class(n, class)).collect()
    }

    fn child_by_class(&mut self, parent: NodeId, class: &str) -> Option<NodeId> {
        // Descendant search, matching querySelector semantics.
        let mut stack: Vec<NodeId> = self.node(parent)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if node.classes.iter().any(|c| c == class) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    fn children(&mut self, parent: NodeId) -> Vec<NodeId> {
        self.node(parent).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn create_child(&mut self, parent: NodeId, tag: &str, class: &str) -> Option<NodeId> {
        self.node(parent)?;
        let classes: Vec<&str> = class.split_whitespace().collect();
        Some(self.add_element(Some(parent), tag, None, &classes))
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root() {
            return;
        }
        let parent = self.node(node).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p.0 as usize)) {
            p.children.retain(|&c| c != node);
        }
        self.detach(node);
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.remove(child);
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.text.clone())
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).and_then(|n| n.styles.get(property).cloned())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let n = self.node(node)?;
        match name {
            "id" => n.id.clone(),
            _ => n.attributes.get(name).cloned(),
        }
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.node(node).map(|n| n.rect).unwrap_or_default()
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.node(node).map(|n| n.offset_top).unwrap_or(0.0)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.node(node).map(|n| n.offset_height).unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_to(&mut self, top: f64) {
        self.scrolls.push(top);
        self.viewport.scroll_y = top.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_follow_document_order() {
        let mut s = MemorySurface::default();
        let a = s.add_element(None, "div", Some("a"), &["card"]);
        let inner = s.add_element(Some(a), "span", None, &["card", "inner"]);
        let b = s.add_element(None, "div", None, &["card"]);
        assert_eq!(s.elements_by_class("card"), vec![a, inner, b]);
        assert_eq!(s.element_by_id("a"), Some(a));
        assert_eq!(s.child_by_class(a, "inner"), Some(inner));
    }

    #[test]
    fn removal_detaches_subtree() {
        let mut s = MemorySurface::default();
        let a = s.add_element(None, "div", None, &[]);
        let b = s.add_element(Some(a), "div", None, &["x"]);
        s.remove(a);
        assert!(!s.is_attached(a));
        assert!(!s.is_attached(b));
        assert!(s.elements_by_class("x").is_empty());
        // Writes to stale handles are ignored.
        s.set_text(b, "ghost");
        assert_eq!(s.text(b), None);
    }

    #[test]
    fn toggle_reports_final_state() {
        let mut s = MemorySurface::default();
        let a = s.add_element(None, "div", None, &[]);
        assert!(s.toggle_class(a, "active"));
        assert!(!s.toggle_class(a, "active"));
        assert!(!s.has_class(a, "active"));
    }

    #[test]
    fn create_child_splits_class_list() {
        let mut s = MemorySurface::default();
        let parent = s.add_element(None, "div", None, &[]);
        let child = s.create_child(parent, "span", "ripple fx").unwrap();
        assert!(s.has_class(child, "ripple"));
        assert!(s.has_class(child, "fx"));
        assert_eq!(s.tag(child), Some("span"));
        assert_eq!(s.children(parent), vec![child]);
    }
}
