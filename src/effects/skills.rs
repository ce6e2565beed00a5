//! One-shot skill bar fills and staggered card reveals.

use crate::surface::{NodeId, Surface};

pub const PROGRESS_CLASS: &str = "skill-progress";
pub const SLIDE_CLASS: &str = "slide-in-right";
const GLOW: &str = "0 0 20px rgba(0, 255, 255, 0.7)";

/// Set the item's progress bar to its `data-skill` percentage.
///
/// Returns the bar so the caller can glow it later; `None` if the item has no
/// bar or no level.
pub fn fill<S: Surface + ?Sized>(surface: &mut S, item: NodeId) -> Option<NodeId> {
    let level = surface.attribute(item, "data-skill")?;
    let bar = surface.child_by_class(item, PROGRESS_CLASS)?;
    surface.set_style(bar, "width", &format!("{}%", level.trim()));
    Some(bar)
}

pub fn glow<S: Surface + ?Sized>(surface: &mut S, bar: NodeId) {
    surface.set_style(bar, "box-shadow", GLOW);
}

pub fn slide_in<S: Surface + ?Sized>(surface: &mut S, node: NodeId) {
    surface.add_class(node, SLIDE_CLASS);
}

/// Delay for the `index`-th element of a staggered group.
pub fn stagger(index: usize, step_ms: f64) -> f64 {
    index as f64 * step_ms
}
