//! Terminal-prompt typewriter cycling through a fixed command list forever.

use crate::config::TypewriterConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Typing,
    /// Full command shown; the next tick starts deleting.
    HoldFull,
    Deleting,
    /// Prompt empty; the next tick moves on to the following command.
    HoldEmpty,
}

/// Text to display after a tick and how long to wait before the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub text: String,
    pub delay_ms: f64,
}

pub struct Typewriter {
    commands: Vec<Vec<char>>,
    index: usize,
    shown: usize,
    phase: Phase,
    type_ms: f64,
    delete_ms: f64,
    hold_full_ms: f64,
    hold_empty_ms: f64,
}

impl Typewriter {
    /// `None` for an empty command list.
    pub fn new(config: &TypewriterConfig) -> Option<Self> {
        if config.commands.is_empty() {
            return None;
        }
        Some(Self {
            commands: config.commands.iter().map(|c| c.chars().collect()).collect(),
            index: 0,
            shown: 0,
            phase: Phase::Typing,
            type_ms: config.type_ms,
            delete_ms: config.delete_ms,
            hold_full_ms: config.hold_full_ms,
            hold_empty_ms: config.hold_empty_ms,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn command_index(&self) -> usize {
        self.index
    }

    pub fn tick(&mut self) -> Step {
        match self.phase {
            Phase::HoldFull => self.phase = Phase::Deleting,
            Phase::HoldEmpty => {
                self.index = (self.index + 1) % self.commands.len();
                self.phase = Phase::Typing;
            }
            Phase::Typing | Phase::Deleting => {}
        }

        let len = self.commands[self.index].len();
        let delay_ms = match self.phase {
            Phase::Typing => {
                self.shown = (self.shown + 1).min(len);
                if self.shown == len {
                    self.phase = Phase::HoldFull;
                    self.hold_full_ms
                } else {
                    self.type_ms
                }
            }
            _ => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.phase = Phase::HoldEmpty;
                    self.hold_empty_ms
                } else {
                    self.delete_ms
                }
            }
        };

        Step { text: self.commands[self.index][..self.shown].iter().collect(), delay_ms }
    }
}
