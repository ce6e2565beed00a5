//! Host document abstraction.
//!
//! Effects never touch `web_sys` directly; they address nodes through opaque
//! [`NodeId`] handles on a [`Surface`]. The browser binding (`crate::web`) maps
//! handles onto DOM elements, while [`MemorySurface`] keeps a small tree in memory
//! so effect logic can be exercised natively.
//!
//! Every operation on a stale or unknown handle is a silent no-op (or `None`):
//! the document owns its nodes and may drop them at any time.

mod memory;

pub use memory::MemorySurface;

/// Opaque handle to a node in the host document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Viewport-relative bounding box in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

pub trait Surface {
    fn body(&self) -> Option<NodeId>;
    fn element_by_id(&mut self, id: &str) -> Option<NodeId>;
    /// Document-order list of elements carrying `class`.
    fn elements_by_class(&mut self, class: &str) -> Vec<NodeId>;
    fn child_by_class(&mut self, parent: NodeId, class: &str) -> Option<NodeId>;
    fn children(&mut self, parent: NodeId) -> Vec<NodeId>;

    /// Append a new `<tag class="class">` under `parent`.
    fn create_child(&mut self, parent: NodeId, tag: &str, class: &str) -> Option<NodeId>;
    /// Detach `node` (and its subtree) from the document.
    fn remove(&mut self, node: NodeId);
    fn clear_children(&mut self, node: NodeId);
    fn is_attached(&self, node: NodeId) -> bool;

    fn text(&self, node: NodeId) -> Option<String>;
    fn set_text(&mut self, node: NodeId, text: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    /// Returns whether the class is present afterwards.
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool;
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn rect(&self, node: NodeId) -> Rect;
    fn offset_top(&self, node: NodeId) -> f64;
    fn offset_height(&self, node: NodeId) -> f64;

    fn viewport(&self) -> Viewport;
    /// Smooth-scroll the document to `top`.
    fn scroll_to(&mut self, top: f64);

    /// Force layout so a subsequent animation write restarts the animation.
    fn reflow(&mut self, _node: NodeId) {}
}

/// Apply a batch of `(property, value)` style writes.
pub fn apply_styles<S: Surface + ?Sized>(surface: &mut S, node: NodeId, styles: &[(&str, &str)]) {
    for (property, value) in styles {
        surface.set_style(node, property, value);
    }
}
