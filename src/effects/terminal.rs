//! Terminal window dressing: blinking cursors and code blocks that type
//! themselves out.

use crate::surface::{NodeId, Surface};

pub const CURSOR_CLASS: &str = "cursor";

/// Flip cursor opacity between `0` and `1`.
pub fn blink<S: Surface + ?Sized>(surface: &mut S, cursor: NodeId) {
    let next = match surface.style(cursor, "opacity").as_deref() {
        Some("0") => "1",
        _ => "0",
    };
    surface.set_style(cursor, "opacity", next);
}

struct CodeBlock {
    node: NodeId,
    text: Vec<char>,
    typed: usize,
}

/// Code blocks captured at startup and replayed one character at a time.
#[derive(Default)]
pub struct CodeTyper {
    blocks: Vec<CodeBlock>,
}

impl CodeTyper {
    /// Capture each block's text and blank it.
    pub fn capture<S: Surface + ?Sized>(surface: &mut S, nodes: &[NodeId]) -> Self {
        let blocks = nodes
            .iter()
            .map(|&node| {
                let text = surface.text(node).unwrap_or_default().chars().collect();
                surface.set_text(node, "");
                CodeBlock { node, text, typed: 0 }
            })
            .collect();
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Reveal one more character of block `index`. Returns `true` while more remain.
    pub fn advance<S: Surface + ?Sized>(&mut self, surface: &mut S, index: usize) -> bool {
        let Some(block) = self.blocks.get_mut(index) else {
            return false;
        };
        if block.typed >= block.text.len() {
            return false;
        }
        block.typed += 1;
        let shown: String = block.text[..block.typed].iter().collect();
        surface.set_text(block.node, &shown);
        block.typed < block.text.len()
    }
}
