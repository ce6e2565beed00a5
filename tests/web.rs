// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn starts_on_a_bare_document() {
    assert!(portfolio_fx::start_effects(None).is_ok());
}

#[wasm_bindgen_test]
fn rejects_malformed_config() {
    assert!(portfolio_fx::start_effects(Some("{oops".into())).is_err());
}

#[wasm_bindgen_test]
fn report_lists_every_role() {
    let report = portfolio_fx::registry_report().unwrap();
    assert_eq!(report.lines().count(), portfolio_fx::Role::ALL.len());
}

#[wasm_bindgen_test]
fn released_handles_are_reused() {
    use portfolio_fx::{DomSurface, Surface};

    let mut surface = DomSurface::new().unwrap();
    let body = surface.body().unwrap();
    let host = surface.create_child(body, "div", "fx-test-host").unwrap();

    let rebuild = |surface: &mut DomSurface| {
        for _ in 0..50 {
            surface.create_child(host, "div", "particle");
        }
        surface.clear_children(host);
    };
    rebuild(&mut surface);
    let slots = surface.slot_count();
    for _ in 0..10 {
        rebuild(&mut surface);
    }
    assert_eq!(surface.slot_count(), slots);

    let ripple = surface.create_child(host, "span", "fx-ripple").unwrap();
    surface.remove(ripple);
    let next = surface.create_child(host, "span", "fx-ripple").unwrap();
    assert_eq!(next, ripple);
    assert!(surface.is_attached(next));
    surface.remove(host);
}

#[wasm_bindgen_test]
fn second_start_is_ignored() {
    assert!(portfolio_fx::start_effects(None).is_ok());
    assert!(portfolio_fx::start_effects(None).is_ok());
}
