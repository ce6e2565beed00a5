//! Viewport-entry gate for reveal animations.
//!
//! The host reports intersection ratios (the browser binding forwards
//! `IntersectionObserver` entries). The gate turns that stream into edge events:
//! the first qualifying entry of an element is [`Entry::First`], every later
//! re-entry after the element left the viewport is [`Entry::Again`]. One-shot
//! effects key off `First` only.

use std::collections::HashMap;

use crate::surface::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    First,
    Again,
}

#[derive(Clone, Copy, Debug, Default)]
struct Watch {
    triggered: bool,
    inside: bool,
}

pub struct VisibilityGate {
    threshold: f64,
    watched: HashMap<NodeId, Watch>,
    order: Vec<NodeId>,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, watched: HashMap::new(), order: Vec::new() }
    }

    pub fn observe(&mut self, node: NodeId) {
        if !self.watched.contains_key(&node) {
            self.watched.insert(node, Watch::default());
            self.order.push(node);
        }
    }

    /// Observed nodes in registration order.
    pub fn observed(&self) -> &[NodeId] {
        &self.order
    }

    pub fn has_triggered(&self, node: NodeId) -> bool {
        self.watched.get(&node).is_some_and(|w| w.triggered)
    }

    /// Feed one intersection sample for `node`.
    pub fn report(&mut self, node: NodeId, ratio: f64) -> Option<Entry> {
        let watch = self.watched.get_mut(&node)?;
        let inside = ratio > 0.0 && ratio >= self.threshold;
        let entered = inside && !watch.inside;
        watch.inside = inside;
        if !entered {
            return None;
        }
        if watch.triggered {
            Some(Entry::Again)
        } else {
            watch.triggered = true;
            Some(Entry::First)
        }
    }
}
