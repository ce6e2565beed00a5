//! Pointer micro-interactions: hover styling, card tilt and click ripples.
//!
//! The router only writes styles and spawns nodes; anything with a lifetime
//! (ripple removal, glitch settle, scrolling) is reported back to the engine,
//! which owns the scheduler.

use std::collections::HashMap;

use crate::registry::{Registry, Role};
use crate::surface::{NodeId, Surface, apply_styles};

pub const RIPPLE_CLASS: &str = "fx-ripple";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    NavLink,
    ProjectLink,
    ProjectCard,
    TechIcon,
    CertCard,
    SocialLink,
    Button,
}

impl Kind {
    fn role(self) -> Role {
        match self {
            Kind::NavLink => Role::NavLinks,
            Kind::ProjectLink => Role::ProjectLinks,
            Kind::ProjectCard => Role::ProjectCards,
            Kind::TechIcon => Role::TechIcons,
            Kind::CertCard => Role::CertCards,
            Kind::SocialLink => Role::SocialLinks,
            Kind::Button => Role::Buttons,
        }
    }

    const ALL: [Kind; 7] = [
        Kind::NavLink,
        Kind::ProjectLink,
        Kind::ProjectCard,
        Kind::TechIcon,
        Kind::CertCard,
        Kind::SocialLink,
        Kind::Button,
    ];

    fn enter_styles(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Kind::ProjectLink => &[
                ("transform", "translateX(10px)"),
                ("text-shadow", "0 0 15px var(--cyber-neon-green)"),
            ],
            Kind::ProjectCard => &[
                ("border-color", "var(--cyber-neon-cyan)"),
                ("box-shadow", "0 20px 40px rgba(0, 255, 255, 0.4)"),
            ],
            Kind::TechIcon => &[
                ("box-shadow", "0 0 30px rgba(0, 255, 255, 0.6)"),
                ("border-color", "var(--cyber-neon-cyan)"),
                ("transform", "translateY(-5px) scale(1.05)"),
            ],
            Kind::CertCard => &[("transform", "translateY(-10px) rotateY(5deg) scale(1.05)")],
            Kind::SocialLink => &[
                ("transform", "translateY(-8px) rotate(10deg)"),
                ("box-shadow", "0 10px 25px rgba(0, 255, 255, 0.4)"),
            ],
            Kind::NavLink | Kind::Button => &[],
        }
    }

    fn leave_styles(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Kind::ProjectLink => &[
                ("transform", "translateX(0)"),
                ("text-shadow", "0 0 5px var(--cyber-neon-green)"),
            ],
            Kind::ProjectCard => &[
                ("border-color", "var(--cyber-border)"),
                ("box-shadow", "none"),
                ("transform", "perspective(1000px) rotateX(0) rotateY(0) translateZ(0)"),
            ],
            Kind::TechIcon => &[
                ("box-shadow", "none"),
                ("border-color", "var(--cyber-border)"),
                ("transform", "translateY(0) scale(1)"),
            ],
            Kind::CertCard => &[("transform", "translateY(0) rotateY(0) scale(1)")],
            Kind::SocialLink => &[("transform", "translateY(0) rotate(0deg)"), ("box-shadow", "none")],
            Kind::NavLink | Kind::Button => &[],
        }
    }
}

/// Follow-up work a pointer event asks of the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    pub glitch: Option<NodeId>,
    pub ripple: Option<NodeId>,
    pub navigate: Option<NodeId>,
}

pub struct InteractionRouter {
    kinds: HashMap<NodeId, Vec<Kind>>,
    tilt_divisor: f64,
}

impl InteractionRouter {
    pub fn new(registry: &Registry, tilt_divisor: f64) -> Self {
        let mut kinds: HashMap<NodeId, Vec<Kind>> = HashMap::new();
        for kind in Kind::ALL {
            for &node in registry.all(kind.role()) {
                kinds.entry(node).or_default().push(kind);
            }
        }
        Self { kinds, tilt_divisor: tilt_divisor.max(f64::EPSILON) }
    }

    /// Every node that needs pointer listeners.
    pub fn targets(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.kinds.keys().copied().collect();
        nodes.sort();
        nodes
    }

    pub fn kinds(&self, node: NodeId) -> &[Kind] {
        self.kinds.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn is(&self, node: NodeId, kind: Kind) -> bool {
        self.kinds(node).contains(&kind)
    }

    pub fn enter<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId) -> Response {
        for kind in self.kinds(node) {
            apply_styles(surface, node, kind.enter_styles());
        }
        let glitch = self.is(node, Kind::NavLink) || self.is(node, Kind::ProjectLink);
        Response { glitch: glitch.then_some(node), ..Response::default() }
    }

    pub fn leave<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId) {
        for kind in self.kinds(node) {
            apply_styles(surface, node, kind.leave_styles());
        }
    }

    /// 3-D tilt of project cards following the pointer (viewport coordinates).
    pub fn pointer_move<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId, x: f64, y: f64) {
        if !self.is(node, Kind::ProjectCard) {
            return;
        }
        let rect = surface.rect(node);
        let (local_x, local_y) = (x - rect.x, y - rect.y);
        let (cx, cy) = (rect.width / 2.0, rect.height / 2.0);
        let rotate_x = (local_y - cy) / self.tilt_divisor;
        let rotate_y = (cx - local_x) / self.tilt_divisor;
        surface.set_style(
            node,
            "transform",
            &format!("perspective(1000px) rotateX({rotate_x}deg) rotateY({rotate_y}deg) translateZ(20px)"),
        );
    }

    /// `point` is the click position in viewport coordinates, when known.
    pub fn click<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId, point: Option<(f64, f64)>) -> Response {
        let mut response = Response::default();
        if self.is(node, Kind::NavLink) {
            response.navigate = Some(node);
        }
        if self.is(node, Kind::ProjectLink) {
            response.ripple = spawn_ripple(surface, node, None, "rgba(0, 255, 65, 0.3)");
            response.glitch = Some(node);
        } else if self.is(node, Kind::Button) || self.is(node, Kind::SocialLink) {
            response.ripple = spawn_ripple(surface, node, point, "rgba(0, 255, 255, 0.3)");
        }
        response
    }
}

/// Append an expanding-circle ripple to `host`, centred on `point` or, without
/// one, on the host's centre.
pub fn spawn_ripple<S: Surface + ?Sized>(
    surface: &mut S,
    host: NodeId,
    point: Option<(f64, f64)>,
    color: &str,
) -> Option<NodeId> {
    let rect = surface.rect(host);
    let size = rect.width.max(rect.height);
    let ripple = surface.create_child(host, "span", RIPPLE_CLASS)?;
    let px = format!("{size}px");
    apply_styles(
        surface,
        ripple,
        &[
            ("position", "absolute"),
            ("width", px.as_str()),
            ("height", px.as_str()),
            ("background", color),
            ("border-radius", "50%"),
            ("animation", "ripple 0.6s linear"),
            ("pointer-events", "none"),
            ("z-index", "1000"),
        ],
    );
    match point {
        Some((x, y)) => {
            let left = format!("{}px", x - rect.x - size / 2.0);
            let top = format!("{}px", y - rect.y - size / 2.0);
            apply_styles(surface, ripple, &[("left", left.as_str()), ("top", top.as_str()), ("transform", "scale(0)")]);
        }
        None => apply_styles(
            surface,
            ripple,
            &[("left", "50%"), ("top", "50%"), ("transform", "translate(-50%, -50%) scale(0)")],
        ),
    }
    apply_styles(surface, host, &[("position", "relative"), ("overflow", "hidden")]);
    Some(ripple)
}
