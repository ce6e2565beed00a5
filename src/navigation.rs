//! Navigation bar behaviour: mobile menu, in-page scrolling, active-link
//! tracking, navbar tint and hero parallax.

use crate::config::NavigationConfig;
use crate::registry::{Registry, Role};
use crate::surface::{NodeId, Surface};

pub const ACTIVE_CLASS: &str = "active";

pub struct Navigation {
    navbar: Option<NodeId>,
    toggle: Option<NodeId>,
    menu: Option<NodeId>,
    links: Vec<NodeId>,
    /// Sections carrying an `id`, as `(node, id)`.
    sections: Vec<(NodeId, String)>,
    parallax: Vec<NodeId>,
    config: NavigationConfig,
}

impl Navigation {
    pub fn new<S: Surface + ?Sized>(surface: &S, registry: &Registry, config: &NavigationConfig) -> Self {
        let sections = registry
            .all(Role::Sections)
            .iter()
            .chain(registry.all(Role::HeroSections))
            .filter_map(|&n| surface.attribute(n, "id").map(|id| (n, id)))
            .collect();
        Self {
            navbar: registry.first(Role::Navbar),
            toggle: registry.first(Role::NavToggle),
            menu: registry.first(Role::NavMenu),
            links: registry.all(Role::NavLinks).to_vec(),
            sections,
            parallax: registry.all(Role::HeroVisuals).to_vec(),
            config: config.clone(),
        }
    }

    pub fn is_link(&self, node: NodeId) -> bool {
        self.links.contains(&node)
    }

    pub fn is_toggle(&self, node: NodeId) -> bool {
        self.toggle == Some(node)
    }

    pub fn toggle_menu<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let Some(menu) = self.menu {
            surface.toggle_class(menu, ACTIVE_CLASS);
        }
        if let Some(toggle) = self.toggle {
            surface.toggle_class(toggle, ACTIVE_CLASS);
        }
    }

    fn close_menu<S: Surface + ?Sized>(&self, surface: &mut S) {
        for node in [self.menu, self.toggle].into_iter().flatten() {
            surface.remove_class(node, ACTIVE_CLASS);
        }
    }

    fn mark_active<S: Surface + ?Sized>(&self, surface: &mut S, active: Option<NodeId>) {
        for &link in &self.links {
            if Some(link) == active {
                surface.add_class(link, ACTIVE_CLASS);
            } else {
                surface.remove_class(link, ACTIVE_CLASS);
            }
        }
    }

    /// Scroll to the link's `#target` (offset for the fixed navbar) and close the menu.
    pub fn follow<S: Surface + ?Sized>(&self, surface: &mut S, link: NodeId) {
        let target = surface
            .attribute(link, "href")
            .and_then(|href| href.strip_prefix('#').map(str::to_string))
            .filter(|id| !id.is_empty())
            .and_then(|id| surface.element_by_id(&id));
        if let Some(target) = target {
            let top = surface.offset_top(target) - self.config.header_offset;
            surface.scroll_to(top);
            self.mark_active(surface, Some(link));
        }
        self.close_menu(surface);
    }

    /// Id of the section containing the current scroll position, if any.
    pub fn current_section<S: Surface + ?Sized>(&self, surface: &S) -> Option<String> {
        let scroll = surface.viewport().scroll_y;
        let mut current = None;
        for (node, id) in &self.sections {
            let top = surface.offset_top(*node) - self.config.section_offset;
            let bottom = top + surface.offset_height(*node);
            if scroll >= top && scroll < bottom {
                current = Some(id.clone());
            }
        }
        current
    }

    pub fn on_scroll<S: Surface + ?Sized>(&self, surface: &mut S) {
        let scroll = surface.viewport().scroll_y;
        if let Some(navbar) = self.navbar {
            let (background, blur) = if scroll > self.config.solid_after {
                ("rgba(0, 0, 0, 0.95)", "blur(15px)")
            } else {
                ("rgba(0, 0, 0, 0.9)", "blur(10px)")
            };
            surface.set_style(navbar, "background", background);
            surface.set_style(navbar, "backdrop-filter", blur);
        }

        let current = self.current_section(surface).map(|id| format!("#{id}"));
        let active = self
            .links
            .iter()
            .copied()
            .find(|&l| current.is_some() && surface.attribute(l, "href") == current);
        self.mark_active(surface, active);

        let shift = format!("translateY({}px)", scroll * self.config.parallax_speed);
        for &node in &self.parallax {
            surface.set_style(node, "transform", &shift);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    struct Page {
        surface: MemorySurface,
        nav: Navigation,
        about_link: NodeId,
        work_link: NodeId,
        menu: NodeId,
        navbar: NodeId,
    }

    fn page() -> Page {
        let mut s = MemorySurface::default();
        let navbar = s.add_element(None, "nav", Some("navbar"), &[]);
        s.add_element(Some(navbar), "button", Some("navToggle"), &[]);
        let menu = s.add_element(Some(navbar), "ul", Some("navMenu"), &[]);
        let about_link = s.add_element(Some(menu), "a", None, &["nav-link"]);
        s.set_attribute(about_link, "href", "#about");
        let work_link = s.add_element(Some(menu), "a", None, &["nav-link"]);
        s.set_attribute(work_link, "href", "#work");
        let about = s.add_element(None, "section", Some("about"), &["section"]);
        s.set_offsets(about, 800.0, 600.0);
        let work = s.add_element(None, "section", Some("work"), &["section"]);
        s.set_offsets(work, 1400.0, 900.0);
        let registry = Registry::build(&mut s);
        let nav = Navigation::new(&s, &registry, &NavigationConfig::default());
        Page { surface: s, nav, about_link, work_link, menu, navbar }
    }

    #[test]
    fn follow_scrolls_with_header_offset_and_closes_menu() {
        let mut p = page();
        p.nav.toggle_menu(&mut p.surface);
        assert!(p.surface.has_class(p.menu, ACTIVE_CLASS));
        p.nav.follow(&mut p.surface, p.work_link);
        assert_eq!(p.surface.scroll_requests(), &[1300.0]);
        assert!(p.surface.has_class(p.work_link, ACTIVE_CLASS));
        assert!(!p.surface.has_class(p.about_link, ACTIVE_CLASS));
        assert!(!p.surface.has_class(p.menu, ACTIVE_CLASS));
    }

    #[test]
    fn scroll_tracks_section_and_tints_navbar() {
        let mut p = page();
        p.surface.set_scroll(700.0);
        p.nav.on_scroll(&mut p.surface);
        assert!(p.surface.has_class(p.about_link, ACTIVE_CLASS));
        assert_eq!(p.surface.style(p.navbar, "background").as_deref(), Some("rgba(0, 0, 0, 0.95)"));

        p.surface.set_scroll(1300.0);
        p.nav.on_scroll(&mut p.surface);
        assert!(p.surface.has_class(p.work_link, ACTIVE_CLASS));
        assert!(!p.surface.has_class(p.about_link, ACTIVE_CLASS));

        p.surface.set_scroll(0.0);
        p.nav.on_scroll(&mut p.surface);
        assert!(!p.surface.has_class(p.work_link, ACTIVE_CLASS));
        assert_eq!(p.surface.style(p.navbar, "backdrop-filter").as_deref(), Some("blur(10px)"));
    }
}
