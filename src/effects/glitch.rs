//! Short glitch pulses, either random (ambient) or triggered by hover/click.

use crate::rng::FxRng;
use crate::surface::{NodeId, Surface};

pub struct GlitchGroup {
    ambient: Vec<NodeId>,
    chance: f64,
}

impl GlitchGroup {
    pub fn new(ambient: &[NodeId], chance: f64) -> Self {
        Self { ambient: ambient.to_vec(), chance }
    }

    pub fn is_idle(&self) -> bool {
        self.ambient.is_empty()
    }

    /// Ambient elements that glitch on this roll.
    pub fn roll(&self, rng: &mut FxRng) -> Vec<NodeId> {
        self.ambient.iter().copied().filter(|_| rng.chance(self.chance)).collect()
    }
}

/// Restart the glitch animation on `node`.
pub fn pulse<S: Surface + ?Sized>(surface: &mut S, node: NodeId, animation: &str) {
    surface.set_style(node, "animation", "none");
    surface.reflow(node);
    surface.set_style(node, "animation", animation);
}

pub fn settle<S: Surface + ?Sized>(surface: &mut S, node: NodeId) {
    surface.set_style(node, "animation", "none");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn pulse_then_settle() {
        let mut s = MemorySurface::default();
        let n = s.add_element(None, "h1", None, &["glitch"]);
        pulse(&mut s, n, "glitch-anim-1 0.3s ease-in-out");
        assert_eq!(s.style(n, "animation").as_deref(), Some("glitch-anim-1 0.3s ease-in-out"));
        settle(&mut s, n);
        assert_eq!(s.style(n, "animation").as_deref(), Some("none"));
    }

    #[test]
    fn roll_respects_certainty_bounds() {
        let nodes = [NodeId(1), NodeId(2), NodeId(3)];
        let mut rng = FxRng::seeded(5);
        assert_eq!(GlitchGroup::new(&nodes, 1.0).roll(&mut rng), nodes.to_vec());
        assert!(GlitchGroup::new(&nodes, 0.0).roll(&mut rng).is_empty());
        assert!(GlitchGroup::new(&[], 1.0).is_idle());
    }
}
