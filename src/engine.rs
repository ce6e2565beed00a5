//! The effect engine: one context object owning every group, the shared timer
//! queue and the one-shot flags.
//!
//! Hosts construct it once with a [`Surface`], call [`Engine::start`], then feed
//! it frames and DOM events. Nothing here blocks; every handler returns after a
//! handful of style writes.

use std::collections::HashMap;

use crate::config::EffectsConfig;
use crate::effects::counter::{CounterAnimation, CounterFormat};
use crate::effects::terminal::{self, CURSOR_CLASS, CodeTyper};
use crate::effects::typewriter::{Phase, Typewriter};
use crate::effects::{GlitchGroup, ParticleField, RainField, glitch, skills};
use crate::governor::{FrameRateGovernor, FrameReport, thinned};
use crate::interaction::InteractionRouter;
use crate::navigation::Navigation;
use crate::registry::{Registry, Role};
use crate::rng::FxRng;
use crate::scheduler::{Scheduler, TimerId};
use crate::surface::{NodeId, Surface};
use crate::visibility::{Entry, VisibilityGate};

pub const LOADING_CLASS: &str = "loading";
pub const FADE_CLASS: &str = "fade-in-up";
pub const LOADED_CLASS: &str = "loaded";
pub const ANIMATED_CLASS: &str = "animated";
const SCORE_CLASS: &str = "education-score";
const SKILLS_SECTION_CLASS: &str = "skills-section";
const PROJECTS_SECTION_CLASS: &str = "projects-section";
const EDUCATION_CARD_CLASS: &str = "education-card";

/// Everything that can come due on the shared queue.
#[derive(Clone, Debug, PartialEq)]
enum Timer {
    RainShimmer,
    ParticleRegen,
    TypewriterStart,
    TypewriterTick,
    GlitchRoll,
    GlitchSettle(NodeId),
    RippleExpire(NodeId),
    SkillFill(NodeId),
    SkillGlow(NodeId),
    SlideIn(NodeId),
    FadeIn(NodeId),
    CategoryReveal,
    CounterStep(NodeId),
    CursorBlink,
    CodeChar(usize),
}

struct RunningCounter {
    counter: CounterAnimation,
    interval_ms: f64,
}

struct TypewriterSlot {
    writer: Typewriter,
    text: NodeId,
    output: NodeId,
}

pub struct Engine<S: Surface> {
    surface: S,
    registry: Registry,
    config: EffectsConfig,
    scheduler: Scheduler<Timer>,
    rng: FxRng,
    rain: Option<RainField>,
    particles: Option<ParticleField>,
    typewriter: Option<TypewriterSlot>,
    glitch: GlitchGroup,
    glitching: HashMap<NodeId, TimerId>,
    gate: VisibilityGate,
    governor: FrameRateGovernor,
    router: InteractionRouter,
    navigation: Navigation,
    cursors: Vec<NodeId>,
    code: CodeTyper,
    counters: HashMap<NodeId, RunningCounter>,
    ripples: HashMap<NodeId, TimerId>,
    skill_bars_animated: bool,
    started: bool,
}

impl<S: Surface> Engine<S> {
    pub fn new(mut surface: S, config: EffectsConfig, rng: FxRng) -> Self {
        let registry = Registry::build(&mut surface);

        let rain = RainField::new(registry.first(Role::RainContainer), &config.rain);
        let particles = ParticleField::new(registry.first(Role::ParticleContainer), &config.particles);
        let typewriter = match (
            registry.first(Role::Typewriter),
            registry.first(Role::TypewriterOutput),
            Typewriter::new(&config.typewriter),
        ) {
            (Some(text), Some(output), Some(writer)) => Some(TypewriterSlot { writer, text, output }),
            _ => None,
        };
        let glitch = GlitchGroup::new(registry.all(Role::Glitch), config.glitch.chance);
        let router = InteractionRouter::new(&registry, config.interaction.tilt_divisor);
        let navigation = Navigation::new(&surface, &registry, &config.navigation);
        let cursors = registry
            .all(Role::TerminalBodies)
            .iter()
            .filter_map(|&body| surface.child_by_class(body, CURSOR_CLASS))
            .collect();

        Self {
            gate: VisibilityGate::new(config.visibility.threshold),
            governor: FrameRateGovernor::new(&config.governor),
            scheduler: Scheduler::new(),
            surface,
            registry,
            rng,
            rain,
            particles,
            typewriter,
            glitch,
            glitching: HashMap::new(),
            router,
            navigation,
            cursors,
            code: CodeTyper::default(),
            counters: HashMap::new(),
            ripples: HashMap::new(),
            skill_bars_animated: false,
            started: false,
            config,
        }
    }

    /// Initialise every group present in the document. Later calls are ignored.
    pub fn start(&mut self, now: f64) {
        if self.started {
            return;
        }
        self.started = true;
        let width = self.surface.viewport().width;

        match self.rain.as_mut() {
            Some(rain) => {
                rain.regenerate(&mut self.surface, &mut self.rng, width);
                self.scheduler.every(now, self.config.rain.refresh_ms, Timer::RainShimmer);
            }
            None => log::debug!("rain: no #matrixRain container, group inactive"),
        }

        match self.particles.as_mut() {
            Some(particles) => {
                particles.regenerate(&mut self.surface, &mut self.rng);
                self.scheduler.every(now, self.config.particles.regen_ms, Timer::ParticleRegen);
            }
            None => log::debug!("particles: no #particles container, group inactive"),
        }

        if self.typewriter.is_some() {
            self.scheduler.after(now, self.config.typewriter.start_delay_ms, Timer::TypewriterStart);
        } else {
            log::debug!("typewriter: missing #typewriter/#heroOutput or commands, group inactive");
        }

        let observed: Vec<NodeId> = [
            Role::Sections,
            Role::ProjectCards,
            Role::EducationCards,
            Role::CertCards,
            Role::TimelineItems,
        ]
        .into_iter()
        .flat_map(|role| self.registry.all(role).iter().copied())
        .collect();
        for node in observed {
            self.surface.add_class(node, LOADING_CLASS);
            self.gate.observe(node);
        }

        if !self.glitch.is_idle() {
            self.scheduler.every(now, self.config.glitch.interval_ms, Timer::GlitchRoll);
        }

        if !self.cursors.is_empty() {
            self.scheduler.every(now, self.config.terminal.cursor_blink_ms, Timer::CursorBlink);
        }
        self.code = CodeTyper::capture(&mut self.surface, self.registry.all(Role::CodeBlocks));
        for i in 0..self.code.len() {
            self.scheduler.after(now, self.config.terminal.code_start_delay_ms, Timer::CodeChar(i));
        }

        self.governor.start(now);
        log::info!(
            "effects started: {} roles resolved, {} missing",
            Role::ALL.len() - self.registry.missing().len(),
            self.registry.missing().len()
        );
    }

    /// One display frame: sample the governor, then run every due timer.
    pub fn frame(&mut self, now: f64) -> Option<FrameReport> {
        let report = self.governor.frame(now);
        if let Some(report) = report {
            if report.low {
                log::warn!("frame rate {} below threshold, thinning ambient effects", report.fps);
                self.thin_ambient();
            }
        }
        self.run_timers(now);
        report
    }

    /// Run every timer due at or before `now`, in due order.
    pub fn run_timers(&mut self, now: f64) {
        while let Some(fired) = self.scheduler.pop_due(now) {
            self.dispatch(now, fired.at, fired.event);
        }
    }

    fn dispatch(&mut self, now: f64, at: f64, timer: Timer) {
        match timer {
            Timer::RainShimmer => {
                if let Some(rain) = self.rain.as_mut() {
                    rain.shimmer(&mut self.surface, &mut self.rng);
                }
            }
            Timer::ParticleRegen => {
                if let Some(particles) = self.particles.as_mut() {
                    particles.regenerate(&mut self.surface, &mut self.rng);
                }
                if self.governor.is_degraded() {
                    self.thin_ambient();
                }
            }
            Timer::TypewriterStart => {
                if let Some(slot) = &self.typewriter {
                    self.surface.set_style(slot.output, "opacity", "1");
                }
                self.dispatch(now, at, Timer::TypewriterTick);
            }
            Timer::TypewriterTick => {
                if let Some(slot) = self.typewriter.as_mut() {
                    let step = slot.writer.tick();
                    self.surface.set_text(slot.text, &step.text);
                    self.scheduler.follow_up(at, now, step.delay_ms, Timer::TypewriterTick);
                }
            }
            Timer::GlitchRoll => {
                for node in self.glitch.roll(&mut self.rng) {
                    self.glitch_pulse(at, node);
                }
            }
            Timer::GlitchSettle(node) => {
                self.glitching.remove(&node);
                glitch::settle(&mut self.surface, node);
            }
            Timer::RippleExpire(ripple) => {
                self.ripples.remove(&ripple);
                self.surface.remove(ripple);
            }
            Timer::SkillFill(item) => {
                if let Some(bar) = skills::fill(&mut self.surface, item) {
                    self.scheduler.after(at, self.config.reveal.skill_glow_delay_ms, Timer::SkillGlow(bar));
                }
            }
            Timer::SkillGlow(bar) => skills::glow(&mut self.surface, bar),
            Timer::SlideIn(node) => skills::slide_in(&mut self.surface, node),
            Timer::FadeIn(node) => self.surface.add_class(node, FADE_CLASS),
            Timer::CategoryReveal => {
                let step = self.config.reveal.category_stagger_ms;
                for (i, &node) in self.registry.all(Role::SkillCategories).iter().enumerate() {
                    self.scheduler.after(at, skills::stagger(i, step), Timer::SlideIn(node));
                }
            }
            Timer::CounterStep(score) => {
                let Some(running) = self.counters.get_mut(&score) else {
                    return;
                };
                let frame = running.counter.step();
                let interval = running.interval_ms;
                self.surface.set_text(score, &frame.text);
                if frame.done {
                    self.counters.remove(&score);
                } else {
                    self.scheduler.follow_up(at, now, interval, Timer::CounterStep(score));
                }
            }
            Timer::CursorBlink => {
                for &cursor in &self.cursors {
                    terminal::blink(&mut self.surface, cursor);
                }
            }
            Timer::CodeChar(index) => {
                if self.code.advance(&mut self.surface, index) {
                    let t = &self.config.terminal;
                    let delay = t.code_char_ms + self.rng.unit() * t.code_char_jitter_ms;
                    self.scheduler.follow_up(at, now, delay, Timer::CodeChar(index));
                }
            }
        }
    }

    /// Hide a fixed stride of each ambient pool. Re-applying hides nothing new.
    fn thin_ambient(&mut self) {
        let gov = &self.config.governor;
        if let Some(particles) = &self.particles {
            for i in thinned(particles.pool().len(), gov.particle_stride) {
                self.surface.set_style(particles.pool()[i], "display", "none");
            }
        }
        if let Some(rain) = &self.rain {
            for i in thinned(rain.pool().len(), gov.rain_stride) {
                self.surface.set_style(rain.pool()[i], "display", "none");
            }
        }
    }

    fn glitch_pulse(&mut self, now: f64, node: NodeId) {
        if let Some(previous) = self.glitching.remove(&node) {
            self.scheduler.cancel(previous);
        }
        glitch::pulse(&mut self.surface, node, &self.config.glitch.animation);
        let id = self.scheduler.after(now, self.config.glitch.duration_ms, Timer::GlitchSettle(node));
        self.glitching.insert(node, id);
    }

    /// Window `load`: reveal the hero block and stagger skill categories.
    pub fn on_load(&mut self, now: f64) {
        if let Some(body) = self.surface.body() {
            self.surface.add_class(body, LOADED_CLASS);
        }
        let step = self.config.reveal.hero_stagger_ms;
        for (i, &node) in self.registry.all(Role::HeroContent).iter().enumerate() {
            self.scheduler.after(now, skills::stagger(i, step), Timer::FadeIn(node));
        }
        if self.registry.has(Role::SkillCategories) {
            self.scheduler.after(now, self.config.reveal.category_delay_ms, Timer::CategoryReveal);
        }
    }

    /// Viewport size changed: rebuild both ambient pools for the new width.
    pub fn on_resize(&mut self) {
        let width = self.surface.viewport().width;
        if let Some(rain) = self.rain.as_mut() {
            rain.regenerate(&mut self.surface, &mut self.rng, width);
        }
        if let Some(particles) = self.particles.as_mut() {
            particles.regenerate(&mut self.surface, &mut self.rng);
        }
        if self.governor.is_degraded() {
            self.thin_ambient();
        }
    }

    pub fn on_scroll(&mut self) {
        self.navigation.on_scroll(&mut self.surface);
    }

    /// Intersection sample for an observed node.
    pub fn on_intersection(&mut self, now: f64, node: NodeId, ratio: f64) {
        let Some(entry) = self.gate.report(node, ratio) else {
            return;
        };
        self.surface.add_class(node, FADE_CLASS);

        if self.surface.has_class(node, SKILLS_SECTION_CLASS) {
            self.animate_skill_bars(now);
        }
        if self.surface.has_class(node, PROJECTS_SECTION_CLASS) {
            let step = self.config.reveal.card_stagger_ms;
            for (i, &card) in self.registry.all(Role::ProjectCards).iter().enumerate() {
                self.scheduler.after(now, skills::stagger(i, step), Timer::SlideIn(card));
            }
        }
        if entry == Entry::First && self.surface.has_class(node, EDUCATION_CARD_CLASS) {
            self.start_counter(now, node);
        }
    }

    fn animate_skill_bars(&mut self, now: f64) {
        if self.skill_bars_animated {
            return;
        }
        self.skill_bars_animated = true;
        let step = self.config.reveal.skill_stagger_ms;
        for (i, &item) in self.registry.all(Role::SkillItems).iter().enumerate() {
            self.scheduler.after(now, skills::stagger(i, step), Timer::SkillFill(item));
        }
    }

    fn start_counter(&mut self, now: f64, card: NodeId) {
        let Some(score) = self.surface.child_by_class(card, SCORE_CLASS) else {
            return;
        };
        if self.surface.has_class(score, ANIMATED_CLASS) {
            return;
        }
        self.surface.add_class(score, ANIMATED_CLASS);
        let text = self.surface.text(score).unwrap_or_default();
        let Some((target, format)) = CounterFormat::parse(&text) else {
            log::debug!("counter: no number in {text:?}, left as is");
            return;
        };
        let c = &self.config.counter;
        let (counter, delay_ms, interval_ms) = match format {
            CounterFormat::Plain => {
                let frame_ms = c.plain_frame_ms.max(1.0);
                (CounterAnimation::over_duration(target, c.plain_duration_ms, frame_ms, format), 0.0, frame_ms)
            }
            CounterFormat::Percent | CounterFormat::Gpa => {
                (CounterAnimation::stepped(target, c.steps, format), c.start_delay_ms, c.step_ms)
            }
        };
        self.surface.set_text(score, &counter.initial_text());
        self.counters.insert(score, RunningCounter { counter, interval_ms });
        self.scheduler.after(now, delay_ms + interval_ms, Timer::CounterStep(score));
    }

    pub fn on_pointer_enter(&mut self, now: f64, node: NodeId) {
        let response = self.router.enter(&mut self.surface, node);
        if let Some(target) = response.glitch {
            self.glitch_pulse(now, target);
        }
    }

    pub fn on_pointer_leave(&mut self, node: NodeId) {
        self.router.leave(&mut self.surface, node);
    }

    pub fn on_pointer_move(&mut self, node: NodeId, x: f64, y: f64) {
        self.router.pointer_move(&mut self.surface, node, x, y);
    }

    /// Returns `true` when the host should suppress the default click action.
    pub fn on_click(&mut self, now: f64, node: NodeId, point: Option<(f64, f64)>) -> bool {
        if self.navigation.is_toggle(node) {
            self.navigation.toggle_menu(&mut self.surface);
        }
        let response = self.router.click(&mut self.surface, node, point);
        if let Some(link) = response.navigate {
            self.navigation.follow(&mut self.surface, link);
        }
        if let Some(ripple) = response.ripple {
            let id = self.scheduler.after(now, self.config.interaction.ripple_ms, Timer::RippleExpire(ripple));
            self.ripples.insert(ripple, id);
        }
        if let Some(target) = response.glitch {
            self.glitch_pulse(now, target);
        }
        response.navigate.is_some()
    }

    // --- Introspection -------------------------------------------------------

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Nodes the host should watch for viewport intersection.
    pub fn observed(&self) -> &[NodeId] {
        self.gate.observed()
    }

    /// Nodes the host should attach pointer listeners to.
    pub fn pointer_targets(&self) -> Vec<NodeId> {
        let mut targets = self.router.targets();
        for extra in [self.registry.first(Role::NavToggle)].into_iter().flatten() {
            if !targets.contains(&extra) {
                targets.push(extra);
            }
        }
        targets
    }

    pub fn rain_pool(&self) -> &[NodeId] {
        self.rain.as_ref().map(RainField::pool).unwrap_or(&[])
    }

    pub fn particle_pool(&self) -> &[NodeId] {
        self.particles.as_ref().map(ParticleField::pool).unwrap_or(&[])
    }

    pub fn typewriter_phase(&self) -> Option<Phase> {
        self.typewriter.as_ref().map(|slot| slot.writer.phase())
    }

    pub fn live_ripples(&self) -> usize {
        self.ripples.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn ripple_timer_pending(&self, ripple: NodeId) -> bool {
        self.ripples.get(&ripple).is_some_and(|&id| self.scheduler.is_pending(id))
    }

    pub fn skill_bars_animated(&self) -> bool {
        self.skill_bars_animated
    }

    pub fn is_degraded(&self) -> bool {
        self.governor.is_degraded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn engine_with(build: impl FnOnce(&mut MemorySurface)) -> Engine<MemorySurface> {
        let mut s = MemorySurface::default();
        build(&mut s);
        Engine::new(s, EffectsConfig::default(), FxRng::seeded(11))
    }

    #[test]
    fn empty_document_starts_as_noop() {
        let mut engine = engine_with(|_| {});
        engine.start(0.0);
        engine.frame(10_000.0);
        assert!(engine.rain_pool().is_empty());
        assert!(engine.typewriter_phase().is_none());
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn start_is_idempotent() {
        let mut engine = engine_with(|s| {
            s.add_element(None, "div", Some("particles"), &[]);
        });
        engine.start(0.0);
        let pending = engine.pending_timers();
        engine.start(5.0);
        assert_eq!(engine.pending_timers(), pending);
        assert_eq!(engine.particle_pool().len(), 50);
    }

    #[test]
    fn typewriter_reveals_output_after_start_delay() {
        let mut text = NodeId(0);
        let mut output = NodeId(0);
        let mut engine = engine_with(|s| {
            output = s.add_element(None, "div", Some("heroOutput"), &[]);
            text = s.add_element(Some(output), "span", Some("typewriter"), &[]);
        });
        engine.start(0.0);
        engine.run_timers(999.0);
        assert_eq!(engine.surface().style(output, "opacity"), None);
        engine.run_timers(1_000.0);
        assert_eq!(engine.surface().style(output, "opacity").as_deref(), Some("1"));
        assert_eq!(engine.surface().text(text).as_deref(), Some("w"));
        for t in [1_100.0, 1_200.0, 1_300.0, 1_400.0, 1_500.0] {
            engine.run_timers(t);
        }
        assert_eq!(engine.surface().text(text).as_deref(), Some("whoami"));
        assert_eq!(engine.typewriter_phase(), Some(Phase::HoldFull));
    }

    #[test]
    fn skill_bars_fill_once_with_stagger_and_glow() {
        let mut bars = Vec::new();
        let mut section = NodeId(0);
        let mut engine = engine_with(|s| {
            section = s.add_element(None, "section", Some("skills"), &["section", "skills-section"]);
            for level in ["90", "70"] {
                let item = s.add_element(Some(section), "div", None, &["skill-item"]);
                s.set_attribute(item, "data-skill", level);
                bars.push(s.add_element(Some(item), "div", None, &["skill-progress"]));
            }
        });
        engine.start(0.0);
        engine.on_intersection(0.0, section, 0.5);
        assert!(engine.skill_bars_animated());
        engine.run_timers(0.0);
        assert_eq!(engine.surface().style(bars[0], "width").as_deref(), Some("90%"));
        assert_eq!(engine.surface().style(bars[1], "width"), None);
        engine.run_timers(200.0);
        assert_eq!(engine.surface().style(bars[1], "width").as_deref(), Some("70%"));
        engine.run_timers(700.0);
        assert!(engine.surface().style(bars[1], "box-shadow").is_some());

        engine.on_intersection(800.0, section, 0.0);
        engine.on_intersection(900.0, section, 0.5);
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn observed_nodes_are_marked_loading() {
        let mut card = NodeId(0);
        let mut engine = engine_with(|s| {
            card = s.add_element(None, "div", None, &["cert-card"]);
        });
        engine.start(0.0);
        assert!(engine.surface().has_class(card, LOADING_CLASS));
        assert_eq!(engine.observed(), &[card]);
        engine.on_intersection(10.0, card, 1.0);
        assert!(engine.surface().has_class(card, FADE_CLASS));
    }

    #[test]
    fn glitch_hover_settles_after_duration() {
        let mut link = NodeId(0);
        let mut engine = engine_with(|s| {
            link = s.add_element(None, "a", None, &["nav-link"]);
        });
        engine.start(0.0);
        engine.on_pointer_enter(100.0, link);
        assert_eq!(
            engine.surface().style(link, "animation").as_deref(),
            Some("glitch-anim-1 0.3s ease-in-out")
        );
        engine.on_pointer_enter(200.0, link);
        engine.run_timers(400.0);
        assert_eq!(
            engine.surface().style(link, "animation").as_deref(),
            Some("glitch-anim-1 0.3s ease-in-out")
        );
        engine.run_timers(500.0);
        assert_eq!(engine.surface().style(link, "animation").as_deref(), Some("none"));
    }

    #[test]
    fn plain_score_counts_up_over_duration_without_delay() {
        let mut score = NodeId(0);
        let mut card = NodeId(0);
        let mut engine = engine_with(|s| {
            card = s.add_element(None, "div", None, &["education-card"]);
            score = s.add_element(Some(card), "span", None, &["education-score"]);
            s.set_text(score, "42");
        });
        engine.start(0.0);
        engine.on_intersection(0.0, card, 1.0);
        assert_eq!(engine.surface().text(score).as_deref(), Some("0"));
        engine.run_timers(16.0);
        assert_ne!(engine.surface().text(score).as_deref(), Some("0"));
        let mut t = 16.0;
        while t < 2_000.0 {
            t += 16.0;
            engine.run_timers(t);
        }
        assert_eq!(engine.surface().text(score).as_deref(), Some("42"));
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn page_load_staggers_hero_and_categories() {
        let mut hero = Vec::new();
        let mut category = NodeId(0);
        let mut engine = engine_with(|s| {
            let content = s.add_element(None, "div", None, &["hero-content"]);
            hero.push(s.add_element(Some(content), "h1", None, &[]));
            hero.push(s.add_element(Some(content), "p", None, &[]));
            category = s.add_element(None, "div", None, &["skill-category"]);
        });
        engine.start(0.0);
        engine.on_load(0.0);
        engine.run_timers(0.0);
        assert!(engine.surface().has_class(hero[0], FADE_CLASS));
        assert!(!engine.surface().has_class(hero[1], FADE_CLASS));
        engine.run_timers(1_000.0);
        assert!(engine.surface().has_class(hero[1], FADE_CLASS));
        assert!(engine.surface().has_class(category, skills::SLIDE_CLASS));
        assert!(engine.surface().has_class(NodeId(0), LOADED_CLASS));
    }
}
