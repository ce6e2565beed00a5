//! Logical roles of the host page, resolved to node handles once at startup.

use std::collections::HashMap;

use crate::surface::{NodeId, Surface};

/// How a role is located in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    Id(&'static str),
    Class(&'static str),
    /// Direct children of every element carrying the class, in document order.
    ChildrenOf(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    RainContainer,
    ParticleContainer,
    Typewriter,
    TypewriterOutput,
    Navbar,
    NavToggle,
    NavMenu,
    NavLinks,
    Sections,
    HeroSections,
    SkillItems,
    SkillCategories,
    ProjectCards,
    EducationCards,
    CertCards,
    TimelineItems,
    ProjectLinks,
    SocialLinks,
    Buttons,
    TechIcons,
    Glitch,
    TerminalBodies,
    CodeBlocks,
    HeroContent,
    HeroVisuals,
}

impl Role {
    pub const ALL: [Role; 25] = [
        Role::RainContainer,
        Role::ParticleContainer,
        Role::Typewriter,
        Role::TypewriterOutput,
        Role::Navbar,
        Role::NavToggle,
        Role::NavMenu,
        Role::NavLinks,
        Role::Sections,
        Role::HeroSections,
        Role::SkillItems,
        Role::SkillCategories,
        Role::ProjectCards,
        Role::EducationCards,
        Role::CertCards,
        Role::TimelineItems,
        Role::ProjectLinks,
        Role::SocialLinks,
        Role::Buttons,
        Role::TechIcons,
        Role::Glitch,
        Role::TerminalBodies,
        Role::CodeBlocks,
        Role::HeroContent,
        Role::HeroVisuals,
    ];

    pub fn selector(self) -> Selector {
        use Selector::*;
        match self {
            Role::RainContainer => Id("matrixRain"),
            Role::ParticleContainer => Id("particles"),
            Role::Typewriter => Id("typewriter"),
            Role::TypewriterOutput => Id("heroOutput"),
            Role::Navbar => Id("navbar"),
            Role::NavToggle => Id("navToggle"),
            Role::NavMenu => Id("navMenu"),
            Role::NavLinks => Class("nav-link"),
            Role::Sections => Class("section"),
            Role::HeroSections => Class("hero"),
            Role::SkillItems => Class("skill-item"),
            Role::SkillCategories => Class("skill-category"),
            Role::ProjectCards => Class("project-card"),
            Role::EducationCards => Class("education-card"),
            Role::CertCards => Class("cert-card"),
            Role::TimelineItems => Class("timeline-item"),
            Role::ProjectLinks => Class("project-link"),
            Role::SocialLinks => Class("social-link"),
            Role::Buttons => Class("btn"),
            Role::TechIcons => Class("tech-icon"),
            Role::Glitch => Class("glitch"),
            Role::TerminalBodies => Class("terminal-body"),
            Role::CodeBlocks => Class("code-block"),
            Role::HeroContent => ChildrenOf("hero-content"),
            Role::HeroVisuals => Class("hero-visual"),
        }
    }
}

/// Role → handles map, built once from the live document.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    handles: HashMap<Role, Vec<NodeId>>,
}

impl Registry {
    pub fn build<S: Surface + ?Sized>(surface: &mut S) -> Self {
        let mut handles = HashMap::new();
        for role in Role::ALL {
            let found = match role.selector() {
                Selector::Id(id) => surface.element_by_id(id).into_iter().collect(),
                Selector::Class(class) => surface.elements_by_class(class),
                Selector::ChildrenOf(class) => surface
                    .elements_by_class(class)
                    .into_iter()
                    .flat_map(|parent| surface.children(parent))
                    .collect(),
            };
            if !found.is_empty() {
                handles.insert(role, found);
            }
        }
        Self { handles }
    }

    pub fn first(&self, role: Role) -> Option<NodeId> {
        self.handles.get(&role).and_then(|v| v.first().copied())
    }

    pub fn all(&self, role: Role) -> &[NodeId] {
        self.handles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, role: Role) -> bool {
        self.handles.contains_key(&role)
    }

    /// Roles with no matching node, in declaration order.
    pub fn missing(&self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|r| !self.has(*r)).collect()
    }

    /// One line per role: `Role: n` (or `missing`).
    pub fn report(&self) -> String {
        Role::ALL
            .iter()
            .map(|role| match self.handles.get(role) {
                Some(v) => format!("{role:?}: {}", v.len()),
                None => format!("{role:?}: missing"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn resolves_ids_classes_and_children() {
        let mut s = MemorySurface::default();
        let rain = s.add_element(None, "div", Some("matrixRain"), &[]);
        let link_a = s.add_element(None, "a", None, &["nav-link"]);
        let link_b = s.add_element(None, "a", None, &["nav-link"]);
        let hero = s.add_element(None, "div", None, &["hero-content"]);
        let h1 = s.add_element(Some(hero), "h1", None, &[]);
        let p = s.add_element(Some(hero), "p", None, &[]);

        let reg = Registry::build(&mut s);
        assert_eq!(reg.first(Role::RainContainer), Some(rain));
        assert_eq!(reg.all(Role::NavLinks), &[link_a, link_b]);
        assert_eq!(reg.all(Role::HeroContent), &[h1, p]);
        assert!(reg.all(Role::Buttons).is_empty());
    }

    #[test]
    fn children_of_every_matching_container() {
        let mut s = MemorySurface::default();
        let first = s.add_element(None, "div", None, &["hero-content"]);
        let title = s.add_element(Some(first), "h1", None, &[]);
        let second = s.add_element(None, "div", None, &["hero-content"]);
        let cta = s.add_element(Some(second), "a", None, &["btn"]);
        let blurb = s.add_element(Some(second), "p", None, &[]);

        let reg = Registry::build(&mut s);
        assert_eq!(reg.all(Role::HeroContent), &[title, cta, blurb]);
    }

    #[test]
    fn empty_document_reports_every_role_missing() {
        let mut s = MemorySurface::default();
        let reg = Registry::build(&mut s);
        assert_eq!(reg.missing().len(), Role::ALL.len());
        assert!(reg.report().contains("RainContainer: missing"));
    }
}
