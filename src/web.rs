//! Browser binding: a [`Surface`] over the live DOM, plus the listeners,
//! intersection observer and animation-frame loop that drive the [`Engine`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, ScrollBehavior, ScrollToOptions, Window, window,
};

use crate::config::EffectsConfig;
use crate::engine::Engine;
use crate::error::EffectsError;
use crate::performance_now;
use crate::registry::Registry;
use crate::rng::FxRng;
use crate::surface::{NodeId, Rect, Surface, Viewport};

/// Attribute stamping each adopted element with its handle.
const NODE_ATTR: &str = "data-fx-node";

pub struct DomSurface {
    window: Window,
    document: Document,
    body: Option<NodeId>,
    nodes: Vec<Option<Element>>,
    /// Slots released by `remove`/`clear_children`, reused before growing `nodes`.
    free: Vec<u32>,
}

impl DomSurface {
    pub fn new() -> Result<Self, EffectsError> {
        let window = window().ok_or(EffectsError::NoWindow)?;
        let document = window.document().ok_or(EffectsError::NoDocument)?;
        let mut surface = Self { window, document, body: None, nodes: Vec::new(), free: Vec::new() };
        if let Some(body) = surface.document.body() {
            surface.body = Some(surface.adopt(body.into()));
        }
        Ok(surface)
    }

    fn adopt(&mut self, el: Element) -> NodeId {
        if let Some(id) = el.get_attribute(NODE_ATTR).and_then(|v| v.parse::<u32>().ok()) {
            if let Some(Some(known)) = self.nodes.get(id as usize) {
                if *known == el {
                    return NodeId(id);
                }
            }
        }
        let id = self.free.pop().unwrap_or(self.nodes.len() as u32);
        el.set_attribute(NODE_ATTR, &id.to_string()).ok();
        match self.nodes.get_mut(id as usize) {
            Some(slot) => *slot = Some(el),
            None => self.nodes.push(Some(el)),
        }
        NodeId(id)
    }

    /// Release the slot behind `id`, returning the element it held.
    fn release(&mut self, id: u32) -> Option<Element> {
        let el = self.nodes.get_mut(id as usize).and_then(Option::take)?;
        self.free.push(id);
        Some(el)
    }

    fn forget(&mut self, el: &Element) {
        if let Some(id) = self.node_of(el) {
            self.release(id.0);
        }
    }

    /// Handle slots allocated so far, live or free.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0 as usize).and_then(Option::as_ref)
    }

    fn html(&self, node: NodeId) -> Option<&HtmlElement> {
        self.element(node).and_then(|el| el.dyn_ref::<HtmlElement>())
    }

    /// Handle of an element previously adopted by this surface.
    pub fn node_of(&self, el: &Element) -> Option<NodeId> {
        let id = el.get_attribute(NODE_ATTR)?.parse::<u32>().ok()?;
        match self.nodes.get(id as usize) {
            Some(Some(known)) if known == el => Some(NodeId(id)),
            _ => None,
        }
    }

    fn collect(collection: web_sys::HtmlCollection) -> Vec<Element> {
        (0..collection.length()).filter_map(|i| collection.item(i)).collect()
    }
}

impl Surface for DomSurface {
    fn body(&self) -> Option<NodeId> {
        self.body
    }

    fn element_by_id(&mut self, id: &str) -> Option<NodeId> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.adopt(el))
    }

    fn elements_by_class(&mut self, class: &str) -> Vec<NodeId> {
        let found = Self::collect(self.document.get_elements_by_class_name(class));
        found.into_iter().map(|el| self.adopt(el)).collect()
    }

    fn child_by_class(&mut self, parent: NodeId, class: &str) -> Option<NodeId> {
        let el = self.element(parent)?.query_selector(&format!(".{class}")).ok()??;
        Some(self.adopt(el))
    }

    fn children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(el) = self.element(parent) else {
            return Vec::new();
        };
        let found = Self::collect(el.children());
        found.into_iter().map(|el| self.adopt(el)).collect()
    }

    fn create_child(&mut self, parent: NodeId, tag: &str, class: &str) -> Option<NodeId> {
        let child = self.document.create_element(tag).ok()?;
        child.set_class_name(class);
        self.element(parent)?.append_child(&child).ok()?;
        Some(self.adopt(child))
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(el) = self.release(node.0) {
            el.remove();
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let Some(el) = self.element(node).cloned() else {
            return;
        };
        for child in Self::collect(el.children()) {
            self.forget(&child);
        }
        el.set_inner_html("");
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.is_connected())
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.element(node)?.text_content()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element(node) {
            el.set_text_content(Some(text));
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let value = self.html(node)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(html) = self.html(node) {
            html.style().set_property(property, value).ok();
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            el.class_list().add_1(class).ok();
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            el.class_list().remove_1(class).ok();
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .and_then(|el| el.class_list().toggle(class).ok())
            .unwrap_or(false)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.class_list().contains(class))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|el| {
                let r = el.get_bounding_client_rect();
                Rect::new(r.x(), r.y(), r.width(), r.height())
            })
            .unwrap_or_default()
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.html(node).map(|h| h.offset_top() as f64).unwrap_or(0.0)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.html(node).map(|h| h.offset_height() as f64).unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport {
            width: dim(self.window.inner_width()),
            height: dim(self.window.inner_height()),
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
        }
    }

    fn scroll_to(&mut self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn reflow(&mut self, node: NodeId) {
        // Reading layout flushes pending style so the next write restarts the animation.
        if let Some(html) = self.html(node) {
            let _ = html.offset_height();
        }
    }
}

// --- Wiring ---------------------------------------------------------------

type Shared = Rc<RefCell<Engine<DomSurface>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

thread_local! {
    static ACTIVE: RefCell<Option<Shared>> = const { RefCell::new(None) };
    /// A start is waiting for `DOMContentLoaded`.
    static DEFERRED: Cell<bool> = const { Cell::new(false) };
}

/// Whether the page must finish parsing before roles can be resolved.
fn awaits_content(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn parse_config(json: Option<String>) -> Result<EffectsConfig, EffectsError> {
    match json {
        None => Ok(EffectsConfig::default()),
        #[cfg(feature = "serde_json")]
        Some(json) => EffectsConfig::from_json(&json),
        #[cfg(not(feature = "serde_json"))]
        Some(_) => Err(EffectsError::Config("built without the serde_json feature".into())),
    }
}

/// Start every effect on the current page.
///
/// `config_json` optionally overrides any subset of the tuning constants.
#[wasm_bindgen]
pub fn start_effects(config_json: Option<String>) -> Result<(), JsValue> {
    let config = parse_config(config_json)?;
    if ACTIVE.with(|cell| cell.borrow().is_some()) || DEFERRED.with(Cell::get) {
        log::debug!("effects already started, start ignored");
        return Ok(());
    }
    let document = window()
        .ok_or(EffectsError::NoWindow)?
        .document()
        .ok_or(EffectsError::NoDocument)?;
    if awaits_content(&document.ready_state()) {
        DEFERRED.with(|d| d.set(true));
        let mut pending = Some(config);
        listen(&document, "DOMContentLoaded", move |_| {
            DEFERRED.with(|d| d.set(false));
            if let Some(config) = pending.take() {
                if let Err(err) = launch(config) {
                    log::warn!("effects failed to start: {err}");
                }
            }
        })?;
        log::debug!("document still loading, effects start on DOMContentLoaded");
        return Ok(());
    }
    Ok(launch(config)?)
}

fn launch(config: EffectsConfig) -> Result<(), EffectsError> {
    let surface = DomSurface::new()?;
    let win = surface.window.clone();
    let loaded = surface.document.ready_state() == "complete";

    let mut engine = Engine::new(surface, config, FxRng::from_host());
    let now = performance_now();
    engine.start(now);
    if loaded {
        engine.on_load(now);
    }
    let shared: Shared = Rc::new(RefCell::new(engine));

    attach_window_listeners(&win, &shared, !loaded)?;
    attach_pointer_listeners(&shared)?;
    attach_visibility_observer(&shared)?;
    ACTIVE.with(|cell| cell.replace(Some(shared.clone())));
    start_frame_loop(shared);
    Ok(())
}

/// Which page roles resolved, one `Role: count` line each.
#[wasm_bindgen]
pub fn registry_report() -> Result<String, JsValue> {
    let running = ACTIVE.with(|cell| cell.borrow().as_ref().map(|shared| shared.borrow().registry().report()));
    if let Some(report) = running {
        return Ok(report);
    }
    let mut surface = DomSurface::new()?;
    Ok(Registry::build(&mut surface).report())
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), EffectsError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn attach_window_listeners(win: &Window, shared: &Shared, await_load: bool) -> Result<(), EffectsError> {
    let engine = shared.clone();
    listen(win, "resize", move |_| {
        if let Ok(mut engine) = engine.try_borrow_mut() {
            engine.on_resize();
        }
    })?;
    let engine = shared.clone();
    listen(win, "scroll", move |_| {
        if let Ok(mut engine) = engine.try_borrow_mut() {
            engine.on_scroll();
        }
    })?;
    if await_load {
        let engine = shared.clone();
        listen(win, "load", move |_| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.on_load(performance_now());
            }
        })?;
    }
    Ok(())
}

fn attach_pointer_listeners(shared: &Shared) -> Result<(), EffectsError> {
    let targets: Vec<(NodeId, Element)> = {
        let engine = shared.borrow();
        engine
            .pointer_targets()
            .into_iter()
            .filter_map(|node| engine.surface().element(node).map(|el| (node, el.clone())))
            .collect()
    };
    for (node, el) in targets {
        let engine = shared.clone();
        listen(&el, "mouseenter", move |_| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.on_pointer_enter(performance_now(), node);
            }
        })?;
        let engine = shared.clone();
        listen(&el, "mouseleave", move |_| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.on_pointer_leave(node);
            }
        })?;
        let engine = shared.clone();
        listen(&el, "mousemove", move |evt| {
            let Some(evt) = evt.dyn_ref::<MouseEvent>() else { return };
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.on_pointer_move(node, evt.client_x() as f64, evt.client_y() as f64);
            }
        })?;
        let engine = shared.clone();
        listen(&el, "click", move |evt| {
            // Keyboard activation reports a (0, 0) pointer; fall back to the centre.
            let point = evt
                .dyn_ref::<MouseEvent>()
                .map(|m| (m.client_x() as f64, m.client_y() as f64))
                .filter(|&(x, y)| x != 0.0 || y != 0.0);
            if let Ok(mut engine) = engine.try_borrow_mut() {
                if engine.on_click(performance_now(), node, point) {
                    evt.prevent_default();
                }
            }
        })?;
    }
    Ok(())
}

fn attach_visibility_observer(shared: &Shared) -> Result<(), EffectsError> {
    let (observed, options) = {
        let engine = shared.borrow();
        let vis = &engine.config().visibility;
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(vis.threshold));
        options.set_root_margin(&vis.root_margin());
        let observed: Vec<Element> = engine
            .observed()
            .iter()
            .filter_map(|&node| engine.surface().element(node).cloned())
            .collect();
        (observed, options)
    };
    if observed.is_empty() {
        return Ok(());
    }

    let engine = shared.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
        let now = performance_now();
        let Ok(mut engine) = engine.try_borrow_mut() else { return };
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
            let Some(node) = engine.surface().node_of(&entry.target()) else { continue };
            let ratio = if entry.is_intersecting() { entry.intersection_ratio() } else { 0.0 };
            engine.on_intersection(now, node, ratio);
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    for el in &observed {
        observer.observe(el);
    }
    callback.forget();
    Ok(())
}

fn start_frame_loop(shared: Shared) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if let Ok(mut engine) = shared.try_borrow_mut() {
            engine.frame(ts);
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_loading_document_defers_startup() {
        assert!(awaits_content("loading"));
        assert!(!awaits_content("interactive"));
        assert!(!awaits_content("complete"));
    }
}
