//! Tunable constants for every effect group.
//!
//! All timings are milliseconds. Defaults reproduce the hand-tuned values of the
//! portfolio page; none of them encode a semantic invariant, so hosts may
//! override any subset through [`EffectsConfig::from_json`].

#[cfg(feature = "serde")]
use serde::Deserialize;

pub const DEFAULT_GLYPHS: &str =
    "01アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";

pub const DEFAULT_COMMANDS: &[&str] = &["whoami", "cat profile.txt", "ls skills/", "python main.py"];

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct EffectsConfig {
    pub rain: RainConfig,
    pub particles: ParticleConfig,
    pub typewriter: TypewriterConfig,
    pub glitch: GlitchConfig,
    pub governor: GovernorConfig,
    pub visibility: VisibilityConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub interaction: InteractionConfig,
    pub terminal: TerminalConfig,
    pub navigation: NavigationConfig,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct RainConfig {
    /// Upper bound on live glyphs regardless of viewport width.
    pub capacity: usize,
    /// Pixel width of one rain column.
    pub column_width: f64,
    pub refresh_ms: f64,
    /// Per-glyph probability of being swapped on each refresh.
    pub swap_chance: f64,
    pub glyphs: String,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            column_width: 20.0,
            refresh_ms: 100.0,
            swap_chance: 0.1,
            glyphs: DEFAULT_GLYPHS.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct ParticleConfig {
    pub capacity: usize,
    pub regen_ms: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self { capacity: 50, regen_ms: 5_000.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct TypewriterConfig {
    pub commands: Vec<String>,
    pub start_delay_ms: f64,
    pub type_ms: f64,
    pub delete_ms: f64,
    pub hold_full_ms: f64,
    pub hold_empty_ms: f64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            commands: DEFAULT_COMMANDS.iter().map(|c| c.to_string()).collect(),
            start_delay_ms: 1_000.0,
            type_ms: 100.0,
            delete_ms: 50.0,
            hold_full_ms: 2_000.0,
            hold_empty_ms: 500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct GlitchConfig {
    pub interval_ms: f64,
    pub chance: f64,
    pub duration_ms: f64,
    pub animation: String,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3_000.0,
            chance: 0.1,
            duration_ms: 300.0,
            animation: "glitch-anim-1 0.3s ease-in-out".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct GovernorConfig {
    pub window_ms: f64,
    pub fps_threshold: f64,
    /// Every n-th particle (index % n == 0) is hidden when degrading.
    pub particle_stride: usize,
    pub rain_stride: usize,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self { window_ms: 1_000.0, fps_threshold: 30.0, particle_stride: 2, rain_stride: 3 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct VisibilityConfig {
    pub threshold: f64,
    /// Pixels shaved off the bottom of the viewport before testing intersection.
    pub bottom_margin: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self { threshold: 0.1, bottom_margin: 50.0 }
    }
}

impl VisibilityConfig {
    /// CSS root margin string handed to the browser observer.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct RevealConfig {
    pub skill_stagger_ms: f64,
    pub skill_glow_delay_ms: f64,
    pub card_stagger_ms: f64,
    pub hero_stagger_ms: f64,
    pub category_delay_ms: f64,
    pub category_stagger_ms: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            skill_stagger_ms: 200.0,
            skill_glow_delay_ms: 500.0,
            card_stagger_ms: 300.0,
            hero_stagger_ms: 200.0,
            category_delay_ms: 1_000.0,
            category_stagger_ms: 150.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct CounterConfig {
    /// Percent and GPA scores: pause, then `steps` ticks every `step_ms`.
    pub start_delay_ms: f64,
    pub step_ms: f64,
    pub steps: u32,
    /// Bare numbers count up over a fixed duration instead.
    pub plain_duration_ms: f64,
    pub plain_frame_ms: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self { start_delay_ms: 500.0, step_ms: 20.0, steps: 100, plain_duration_ms: 2_000.0, plain_frame_ms: 16.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct InteractionConfig {
    pub ripple_ms: f64,
    /// Divisor turning pointer offset (px) into card tilt (deg).
    pub tilt_divisor: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { ripple_ms: 600.0, tilt_divisor: 10.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct TerminalConfig {
    pub cursor_blink_ms: f64,
    pub code_start_delay_ms: f64,
    pub code_char_ms: f64,
    pub code_char_jitter_ms: f64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cursor_blink_ms: 500.0,
            code_start_delay_ms: 2_000.0,
            code_char_ms: 50.0,
            code_char_jitter_ms: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct NavigationConfig {
    pub header_offset: f64,
    pub solid_after: f64,
    pub section_offset: f64,
    pub parallax_speed: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { header_offset: 100.0, solid_after: 100.0, section_offset: 150.0, parallax_speed: 0.5 }
    }
}

impl EffectsConfig {
    /// Parse a (possibly partial) JSON override; absent fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::EffectsError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_page_values() {
        let cfg = EffectsConfig::default();
        assert_eq!(cfg.rain.capacity, 100);
        assert_eq!(cfg.particles.capacity, 50);
        assert_eq!(cfg.typewriter.commands.len(), 4);
        assert_eq!(cfg.interaction.ripple_ms, 600.0);
        assert_eq!(cfg.visibility.root_margin(), "0px 0px -50px 0px");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EffectsConfig::from_json(r#"{"typewriter":{"commands":["a","bb"],"type_ms":10}}"#)
            .unwrap();
        assert_eq!(cfg.typewriter.commands, vec!["a".to_string(), "bb".to_string()]);
        assert_eq!(cfg.typewriter.type_ms, 10.0);
        assert_eq!(cfg.typewriter.delete_ms, 50.0);
        assert_eq!(cfg.rain, RainConfig::default());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_a_config_error() {
        let err = EffectsConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::EffectsError::Config(_)));
    }
}
