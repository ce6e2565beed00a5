//! Effect groups: each owns its own state and writes only to its own nodes.

pub mod counter;
pub mod glitch;
pub mod particles;
pub mod rain;
pub mod skills;
pub mod terminal;
pub mod typewriter;

pub use counter::{CounterAnimation, CounterFormat, CounterFrame};
pub use glitch::GlitchGroup;
pub use particles::ParticleField;
pub use rain::RainField;
pub use terminal::CodeTyper;
pub use typewriter::{Phase, Step, Typewriter};
