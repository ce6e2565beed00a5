//! Falling glyph rain.
//!
//! A pool of absolutely positioned glyphs whose fall is pure CSS animation; the
//! only work on our side is seeding randomised timing and periodically swapping
//! glyphs so the columns shimmer.

use crate::config::RainConfig;
use crate::rng::FxRng;
use crate::surface::{NodeId, Surface};

pub const GLYPH_CLASS: &str = "matrix-char";

pub struct RainField {
    container: NodeId,
    glyphs: Vec<char>,
    capacity: usize,
    column_width: f64,
    swap_chance: f64,
    pool: Vec<NodeId>,
}

impl RainField {
    /// `None` when there is no container or no glyph to draw with.
    pub fn new(container: Option<NodeId>, config: &RainConfig) -> Option<Self> {
        let glyphs: Vec<char> = config.glyphs.chars().collect();
        if glyphs.is_empty() {
            return None;
        }
        Some(Self {
            container: container?,
            glyphs,
            capacity: config.capacity,
            column_width: config.column_width.max(1.0),
            swap_chance: config.swap_chance,
            pool: Vec::new(),
        })
    }

    pub fn columns_for(&self, viewport_width: f64) -> usize {
        (viewport_width / self.column_width).floor().max(0.0) as usize
    }

    /// Live glyph count for a viewport width.
    pub fn pool_size_for(&self, viewport_width: f64) -> usize {
        self.columns_for(viewport_width).min(self.capacity)
    }

    pub fn pool(&self) -> &[NodeId] {
        &self.pool
    }

    fn sample(&self, rng: &mut FxRng) -> char {
        self.glyphs[rng.index(self.glyphs.len())]
    }

    /// Drop every glyph and build a fresh pool sized for `viewport_width`.
    pub fn regenerate<S: Surface + ?Sized>(&mut self, surface: &mut S, rng: &mut FxRng, viewport_width: f64) {
        surface.clear_children(self.container);
        self.pool.clear();
        for _ in 0..self.pool_size_for(viewport_width) {
            let Some(node) = surface.create_child(self.container, "div", GLYPH_CLASS) else {
                break;
            };
            let glyph = self.sample(rng);
            surface.set_text(node, glyph.encode_utf8(&mut [0; 4]));
            surface.set_style(node, "left", &format!("{}%", rng.unit() * 100.0));
            surface.set_style(node, "animation-duration", &format!("{}s", rng.range(2.0, 5.0)));
            surface.set_style(node, "animation-delay", &format!("{}s", rng.range(0.0, 2.0)));
            surface.set_style(node, "opacity", &format!("{}", rng.range(0.3, 1.0)));
            self.pool.push(node);
        }
    }

    /// Swap a random subset of glyphs. Returns how many changed.
    pub fn shimmer<S: Surface + ?Sized>(&mut self, surface: &mut S, rng: &mut FxRng) -> usize {
        let mut swapped = 0;
        for i in 0..self.pool.len() {
            if rng.chance(self.swap_chance) {
                let glyph = self.sample(rng);
                surface.set_text(self.pool[i], glyph.encode_utf8(&mut [0; 4]));
                swapped += 1;
            }
        }
        swapped
    }
}
