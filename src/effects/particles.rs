//! Ambient floating particles, rebuilt wholesale on a fixed cadence.

use crate::config::ParticleConfig;
use crate::rng::FxRng;
use crate::surface::{NodeId, Surface};

pub const PARTICLE_CLASS: &str = "particle";

pub struct ParticleField {
    container: NodeId,
    capacity: usize,
    pool: Vec<NodeId>,
}

impl ParticleField {
    pub fn new(container: Option<NodeId>, config: &ParticleConfig) -> Option<Self> {
        Some(Self { container: container?, capacity: config.capacity, pool: Vec::new() })
    }

    pub fn pool(&self) -> &[NodeId] {
        &self.pool
    }

    pub fn regenerate<S: Surface + ?Sized>(&mut self, surface: &mut S, rng: &mut FxRng) {
        surface.clear_children(self.container);
        self.pool.clear();
        for _ in 0..self.capacity {
            let Some(node) = surface.create_child(self.container, "div", PARTICLE_CLASS) else {
                break;
            };
            surface.set_style(node, "left", &format!("{}%", rng.unit() * 100.0));
            surface.set_style(node, "animation-duration", &format!("{}s", rng.range(2.0, 5.0)));
            surface.set_style(node, "animation-delay", &format!("{}s", rng.range(0.0, 3.0)));
            self.pool.push(node);
        }
    }
}
